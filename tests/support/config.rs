use std::io::Write;

use tempfile::NamedTempFile;

pub const BINARY_CONFIG: &str = r#"
[market]
id = "rain-tomorrow"
outcomes = ["Yes", "No"]
initial_liquidity = 1.0

[market.model]
type = "scoring_rule"
vig = 0.1
fee_curve = [0.01, 6.0, 2.0]
min_revenue = 0.4
warmup = 1

[logging]
level = "error"
format = "pretty"
"#;

pub fn write_temp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file
}
