pub mod constants;
pub mod date_range;
pub mod templates;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
