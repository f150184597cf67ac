pub mod formatter;

pub use formatter::{
    format_heading, format_product_detail, format_product_table, format_result, format_score,
    format_tsv, should_use_colors, truncate_name,
};
