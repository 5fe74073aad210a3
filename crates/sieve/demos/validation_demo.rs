//! Walkthrough of string rules, schemas and validator configuration

use serde_json::{json, Value};
use sieve::{
    PatternRule, Record, ReplaceRule, Rule, Schema, SchemaValidator, StringRule, ValidatorConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("sieve demo");
    println!("==========\n");

    demo_string_rules()?;
    demo_schema_validation()?;
    demo_unknown_fields()?;

    println!("All demos completed.");
    Ok(())
}

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map.into_iter().collect(),
        _ => Record::new(),
    }
}

fn demo_string_rules() -> Result<(), Box<dyn std::error::Error>> {
    println!("1. String rules");
    println!("---------------");

    let schema = Schema::new()
        .field("id", StringRule::new().min_length(3))
        .field(
            "username",
            StringRule::new().replace(ReplaceRule::regex("[0-9]", "X")?.first_only()),
        );

    for input in [
        json!({ "id": "abc", "username": "user123" }),
        json!({ "id": "ab", "username": "user123" }),
    ] {
        match SchemaValidator::new(schema.clone()).validate(&record(input.clone())) {
            Ok(output) => println!("  ok    {} -> {:?}", input, output),
            Err(error) => println!("  error {} -> {}", input, error),
        }
    }
    println!();
    Ok(())
}

fn demo_schema_validation() -> Result<(), Box<dyn std::error::Error>> {
    println!("2. Schema validation");
    println!("--------------------");

    let schema = Schema::new()
        .field(
            "email",
            StringRule::new()
                .required()
                .trim()
                .pattern(PatternRule::new(r"^\s*[^@\s]+@[^@\s]+\.[a-z]+\s*$")?.message("email is not valid")),
        )
        .one_of("plan", ["free", "pro"])
        .field("seats", Rule::string());

    let validator = SchemaValidator::new(schema);
    println!("  schema: {}", validator.schema().describe());

    for input in [
        json!({ "email": " ada@example.com ", "plan": "pro", "seats": 5 }),
        json!({ "email": "not-an-email", "plan": "pro" }),
        json!({ "email": "ada@example.com", "plan": "enterprise" }),
        json!({ "plan": "free" }),
    ] {
        match validator.validate(&record(input.clone())) {
            Ok(output) => println!("  ok    {:?}", output),
            Err(error) => println!("  error {} ({})", error, error.to_json()),
        }
    }
    println!();
    Ok(())
}

fn demo_unknown_fields() -> Result<(), Box<dyn std::error::Error>> {
    println!("3. Unknown fields");
    println!("-----------------");

    let schema = Schema::new().field("id", Rule::string());
    let input = record(json!({ "id": 42, "debug": true }));

    let pass_through = SchemaValidator::new(schema.clone()).validate(&input)?;
    println!("  pass-through: {:?}", pass_through);

    let config = ValidatorConfig::builder().drop_unknown().build_config();
    let dropped = SchemaValidator::with_config(schema, config).validate(&input)?;
    println!("  drop:         {:?}", dropped);
    println!();
    Ok(())
}
