pub mod feature_flags;
pub mod json_path;
pub mod tokens;
