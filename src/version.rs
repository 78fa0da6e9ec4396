pub const VERSION: &str = match option_env!("MOCK_BMC_BUILD_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};
