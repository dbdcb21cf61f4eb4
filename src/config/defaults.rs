pub const URL_ENV_VAR: &str = "STANDARD_BOTS_URL";
pub const API_KEY_ENV_VAR: &str = "STANDARD_BOTS_API_KEY";

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8000
}

pub fn default_list_limit() -> u32 {
    10
}

pub fn default_list_offset() -> u32 {
    0
}
