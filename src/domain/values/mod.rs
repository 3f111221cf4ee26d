pub mod category;
pub mod confidence;
pub mod insights;
pub mod product_key;
pub mod quality;
pub mod similarity;
pub mod source;
