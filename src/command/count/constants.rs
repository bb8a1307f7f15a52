pub const COUNT_DEFAULT_CONFIG: &str = "config_default.json";
