use json2xml_rs::{to_string, ConvertOptions, NullStyle};
use serde_json::json;

fn main() {
    env_logger::init();

    println!("=== JSON to XML Examples ===\n");

    // Example 1: Simple object
    println!("1. Simple object:");
    let data = json!({
        "name": "Alice",
        "age": 30,
        "active": true
    });
    println!("{}\n", convert(&data, &ConvertOptions::default()));

    // Example 2: Nested object
    println!("2. Nested object:");
    let data = json!({
        "user": {
            "id": 123,
            "name": "Bob",
            "email": "bob@example.com"
        },
        "status": "active"
    });
    println!("{}\n", convert(&data, &ConvertOptions::default()));

    // Example 3: Arrays keep their elements anonymous
    println!("3. Array of objects:");
    let data = json!({
        "users": [
            {"id": 1, "name": "Alice", "role": "admin"},
            {"id": 2, "name": "Bob", "role": "user"}
        ]
    });
    println!("{}\n", convert(&data, &ConvertOptions::default()));

    // Example 4: Bare scalar at the top level
    println!("4. Bare scalar:");
    println!("{}\n", convert(&json!(42), &ConvertOptions::default()));

    // Example 5: Null rendering styles
    println!("5. Null styles:");
    let data = json!({"missing": null});
    for null in [NullStyle::SelfClosing, NullStyle::Empty, NullStyle::Literal] {
        println!("{:?}: {}", null, convert(&data, &ConvertOptions { null }));
    }
    println!();

    // Example 6: Markup characters are escaped
    println!("6. Escaping:");
    let data = json!({"<script>": "if (a < b && c > d) {}"});
    println!("{}\n", convert(&data, &ConvertOptions::default()));

    // Example 7: Malformed input
    println!("7. Malformed input:");
    match to_string(r#"{"a": [1, 2"#, &ConvertOptions::default()) {
        Ok(xml) => println!("unexpected success: {}", xml),
        Err(err) => println!("error: {}", err),
    }
}

fn convert(data: &serde_json::Value, options: &ConvertOptions) -> String {
    match to_string(&data.to_string(), options) {
        Ok(xml) => xml,
        Err(err) => format!("error: {}", err),
    }
}
