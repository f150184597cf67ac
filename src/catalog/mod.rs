pub mod decode;
pub mod types;

pub use types::{
    AirConditionerSpec, BikeSpec, CarSpec, Category, MobileSpec, ProductRecord, ProductSpec, Row,
};
