//! Foo Double Demo - Configuring a Test Double
//!
//! Demonstrates the Doble setup API against a small `Foo` interface:
//! exact and wildcard matchers, computed results, throws, out slots,
//! async members and property stubbing.
//!
//! # Running
//!
//! ```bash
//! DOBLE_LOG=doble=debug cargo run --example foo_double -p doble
//! ```

#![allow(clippy::uninlined_format_args, clippy::unwrap_used)]

use doble::prelude::*;
use doble::tracing_support::init_test_tracing;

fn foo_interface() -> Interface {
    Interface::new("Foo")
        .method(
            Method::new("do_something")
                .param("command", ValueKind::Str)
                .returns(ValueKind::Bool),
        )
        .method(
            Method::new("do_something_stringy")
                .param("command", ValueKind::Str)
                .returns(ValueKind::Str),
        )
        .method(
            Method::new("try_parse")
                .param("value", ValueKind::Str)
                .out_param("result", ValueKind::Str)
                .returns(ValueKind::Bool),
        )
        .method(Method::new("do_something_async").returns_async(ValueKind::Bool))
        .property("name", ValueKind::Str)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_test_tracing();
    println!("=== Doble Foo Double Demo ===\n");

    let mock = Mock::with_config(
        foo_interface(),
        MockConfig::new().with_name("foo-demo").with_stubbed_properties(),
    );

    demo_matchers(&mock)?;
    demo_throws(&mock)?;
    demo_out_slot(&mock)?;
    demo_async(&mock)?;
    demo_properties(&mock)?;

    println!("\n{} setups registered on mock {}", mock.setup_count(), mock.id());
    println!("=== Foo Double Demo Complete ===");
    Ok(())
}

fn demo_matchers(mock: &Mock) -> Result<(), Box<dyn std::error::Error>> {
    println!("--- Demo 1: Matchers ---\n");

    mock.setup("do_something", [it::eq("ping")]).returns(true)?;
    mock.setup("do_something_stringy", [it::any()])
        .returns_with(|args: &[Value]| args[0].as_str().unwrap_or_default().to_lowercase())?;

    println!("do_something(\"ping\")       = {}", mock.call("do_something", &args!["ping"])?);
    println!("do_something(\"pong\")       = {}", mock.call("do_something", &args!["pong"])?);
    println!(
        "do_something_stringy(\"Vivek\") = {}",
        mock.call("do_something_stringy", &args!["Vivek"])?
    );
    Ok(())
}

fn demo_throws(mock: &Mock) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Demo 2: Throws ---\n");

    mock.setup("do_something", [it::eq("reset")])
        .throws_kind::<InvalidOperation>()?;

    match mock.call("do_something", &args!["reset"]) {
        Ok(v) => println!("unexpected result: {}", v),
        Err(e) => println!("do_something(\"reset\") raised: {}", e),
    }
    Ok(())
}

fn demo_out_slot(mock: &Mock) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Demo 3: Out Slots ---\n");

    mock.setup("try_parse", [it::eq("ping"), it::any_ref()])
        .sets_out(1, "ack")
        .returns(true)?;

    let mut slots = Slots::new();
    let ok = mock.call_with_slots("try_parse", &args!["ping", ()], &mut slots)?;
    println!("try_parse(\"ping\") = {}, out = {:?}", ok, slots.get(1));
    Ok(())
}

fn demo_async(mock: &Mock) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Demo 4: Async Members ---\n");

    mock.setup("do_something_async", []).returns_async(true)?;
    let pending: PendingValue = mock.call("do_something_async", &[])?.into_typed()?;
    println!("do_something_async() settles to {}", pending.settle()?);
    Ok(())
}

fn demo_properties(mock: &Mock) -> Result<(), Box<dyn std::error::Error>> {
    println!("\n--- Demo 5: Properties ---\n");

    println!("name before set = {}", mock.get("name")?);
    mock.set("name", "bar")?;
    println!("name after set  = {}", mock.get("name")?);
    Ok(())
}
