//! Account form validation example.
//!
//! Run with: cargo run --example account_form
//!
//! Serves a rule set from memory, validates a sign-up form twice and prints
//! the verdicts. Log output goes to stderr.

use std::collections::HashMap;

use fieldrules_lib::ValidationClient;
use fieldrules_lib::messages::MessageCatalog;
use fieldrules_lib::source::StaticRuleSource;
use simplelog::{Config, LevelFilter, WriteLogger};

const RULES: &str = r#"{
    "validation": {
        "username": [
            {"msg": "required"},
            {"msg": "alpha_dash"},
            {"msg": "max_length", "param": 20}
        ],
        "email": [
            {"msg": "required"},
            {"msg": "valid_email"}
        ],
        "password": [
            {"msg": "required"},
            {"msg": "min_length", "param": "8"},
            {"msg": "callback_has_numbers"}
        ],
        "password_confirm": [
            {"msg": "matches", "param": "password"}
        ],
        "age": [
            {"msg": "is_natural"},
            {"msg": "greater_than", "param": "12"}
        ]
    }
}"#;

const LANGUAGE: &str = r#"{
    "validation": {
        "required": "This field is required.",
        "alpha_dash": "Only letters, numbers, underscores and dashes.",
        "max_length": "No more than %s characters.",
        "valid_email": "Enter a valid email address.",
        "min_length": "At least %s characters.",
        "callback_has_numbers": "Include at least one number.",
        "matches": "Must match the %s field.",
        "is_natural": "Enter a whole number.",
        "greater_than": "Must be greater than %s."
    },
    "password": "Password"
}"#;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = WriteLogger::init(LevelFilter::Debug, Config::default(), std::io::stderr());

    let base_url = "https://example.com/validation";
    let source = StaticRuleSource::new().with_document(format!("{}/account", base_url), RULES);

    let client = ValidationClient::builder()
        .base_url(base_url)
        .messages(MessageCatalog::from_json(LANGUAGE)?)
        .source(source)
        .build()?;

    let session = client.create_session("account")?;
    session.register_run_after(|| async {
        println!("Rule set loaded, populating form...");
        Ok::<(), fieldrules_lib::error::BoxError>(())
    });
    session.on_ready().await?;

    let mut form = HashMap::from([
        ("username", "jane doe"),
        ("email", "jane@example"),
        ("password", "secret"),
        ("password_confirm", "secret"),
        ("age", "9"),
    ]);

    println!("\nFirst attempt:");
    let result = session.validate_all(&form)?;
    for error in result.errors() {
        println!("  {}: {}", error.field_name, error.message);
    }

    form.insert("username", "jane_doe");
    form.insert("email", "jane@example.com");
    form.insert("password", "secret42");
    form.insert("age", "34");

    println!("\nSecond attempt:");
    let verdict = session.validate_field("password_confirm", "secret", &form)?;
    println!("  password_confirm: {}", verdict.error_message);

    form.insert("password_confirm", "secret42");
    let result = session.validate_all(&form)?;
    println!("  form valid: {}", result.is_valid());

    Ok(())
}
