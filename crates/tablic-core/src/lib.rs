#![deny(warnings)]
pub mod belief;
pub mod capture;
pub mod game;
pub mod model;
pub mod ranking;

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "tablic"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "tablic");
        assert!(!AppInfo::version().is_empty());
    }
}
