// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! refract-demo - Walk through dynamic types and container helpers.
//!
//! Usage:
//!   refract-demo
//!   refract-demo --log-level debug
//!   refract-demo --json '{"a":{"b":"c"},"d":[1,2,"e","f"]}' --key d --index 3

use anyhow::Context;
use clap::Parser;
use refract::builder::{self, new_field, new_struct_definition, new_type_instance};
use refract::value::value_of;
use refract::{ops, Kind, Type, Value};
use refract_dict::{JsonDict, JsonNode};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_DOC: &str = r#"{"a":{"b":"c"},"d":[1,2,"e","f"],"g":[{"h":"i"},{"j":"k"}]}"#;

#[derive(Parser, Debug)]
#[command(name = "refract-demo")]
#[command(about = "Walk through refract dynamic types and container helpers")]
#[command(version)]
struct Args {
    /// JSON document for the dictionary walkthrough
    #[arg(long, default_value = DEFAULT_DOC)]
    json: String,

    /// Key of an array in the document
    #[arg(long, default_value = "d")]
    key: String,

    /// Index to read from that array
    #[arg(long, default_value = "3")]
    index: usize,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// Render a value the way `{:v}` would for plain data.
fn show(v: &Value) -> refract::Result<String> {
    Ok(match v.kind() {
        Kind::Invalid => "<invalid>".to_string(),
        Kind::Bool => v.as_bool()?.to_string(),
        Kind::Isize | Kind::I8 | Kind::I16 | Kind::I32 | Kind::I64 => v.as_int()?.to_string(),
        Kind::Usize | Kind::U8 | Kind::U16 | Kind::U32 | Kind::U64 => v.as_uint()?.to_string(),
        Kind::F32 | Kind::F64 => v.as_float()?.to_string(),
        Kind::String => v.as_string()?,
        Kind::Array | Kind::Slice => {
            let mut parts = Vec::new();
            ops::range_over_slice(v, |_, item| {
                parts.push(show(&item)?);
                Ok(())
            })?;
            format!("[{}]", parts.join(" "))
        }
        Kind::Map => {
            let mut parts = Vec::new();
            ops::range_over_map(v, |_, k, item| {
                parts.push(format!("{}:{}", show(&k)?, show(&item)?));
                Ok(())
            })?;
            format!("map[{}]", parts.join(" "))
        }
        Kind::Struct => {
            let ty = v.ty()?;
            let mut parts = Vec::new();
            for i in 0..v.num_field()? {
                parts.push(format!("{}:{}", ty.field(i)?.name, show(&v.field(i)?)?));
            }
            format!("{{{}}}", parts.join(" "))
        }
        Kind::Pointer | Kind::Interface => {
            if v.is_nil()? {
                "<nil>".to_string()
            } else if v.kind() == Kind::Pointer {
                format!("&{}", show(&v.elem()?)?)
            } else {
                show(&v.elem()?)?
            }
        }
        Kind::Chan | Kind::Func => v.to_string(),
    })
}

fn record(ty: &Type, value: &str) -> anyhow::Result<Value> {
    let m = new_type_instance(ty);
    builder::set_struct_field_value(&m, "TestField", &value_of(value))?;
    Ok(m)
}

fn records() -> anyhow::Result<()> {
    let d = new_struct_definition(vec![new_field("TestField", String::new(), "")])?;
    info!("defined {}", d);

    let mut s = builder::new_slice_of_type(&d)?;
    s = ops::append(&s, &[record(&d, "testVal1")?])?;
    s = ops::append(&s, &[record(&d, "testVal2")?])?;
    s = ops::prepend(&s, &[record(&d, "banana")?])?;
    println!("{}, {}", show(&s)?, ops::len(&s)?);

    ops::range_over_slice(&s, |_, item| {
        println!("{}", show(&item)?);
        Ok(())
    })?;

    let first = ops::get_index(&s, 0)?;
    let tf: String = builder::get_struct_field_value(&first, "TestField")?;
    println!("{}", tf);

    // writes through an element handle land in the sequence
    builder::set_struct_field_value(&first, "TestField", &value_of("not a banana"))?;
    println!("{}", show(&s)?);

    let replacement = record(&d, "replaced")?;
    ops::set_index(&s, 0, &replacement)?;
    println!("{}", show(&s)?);

    let copy = ops::get_index_value(&s, 0)?;
    println!("{} (settable: {})", show(&copy)?, copy.can_set());

    let mappy = builder::new_map_of_type(String::new(), &d)?;
    ops::put_map_index(&mappy, &value_of("ind1"), &record(&d, "I'm in the mappy")?)?;
    if let Some(v) = ops::get_map_index(&mappy, &value_of("ind1"))? {
        println!("MapVal: {}", show(&v)?);
    }
    if let Some(v) = ops::get_map_index_value(&mappy, &value_of("ind1"))? {
        println!("MapVal: {}", show(&v)?);
    }

    let instance = new_type_instance(&d);
    println!("{}", instance.ty()?);
    println!("{}", new_type_instance(&instance.ty()?).ty()?);
    println!("type: {}", s.ty()?);
    println!("kind: {}", s.kind());

    match ops::get_index(&s, 5) {
        Ok(_) => warn!("index 5 unexpectedly in range"),
        Err(e) => info!("guarded: {}", e),
    }
    Ok(())
}

fn native_ints() -> anyhow::Result<()> {
    let j = value_of(Vec::<i64>::new());
    let k = ops::append(
        &j,
        &[value_of(1i64), value_of(2i64), value_of(3i64), value_of(vec![9i64, 8, 7])],
    )?;
    let k = ops::prepend(
        &k,
        &[
            value_of(vec![10i64, 10, 10]),
            value_of(9i64),
            value_of(9i64),
            value_of(9i64),
            value_of(vec![4i64, 4, 4]),
        ],
    )?;
    println!("{}", show(&k)?);

    let sl2 = ops::append(&value_of(Vec::<i64>::new()), &[value_of(1i64)])?;
    println!("{}", show(&ops::get_index_value(&sl2, 0)?)?);
    Ok(())
}

fn dictionaries(args: &Args) -> anyhow::Result<()> {
    let dict = JsonDict::from_json(&args.json).context("parsing --json")?;
    debug!("dictionary keys: {:?}", dict.keys().collect::<Vec<_>>());
    match dict.get_slice(&args.key) {
        Some(slice) => match slice.get_index(args.index) {
            Ok(v) => println!("{}", v),
            Err(e) => println!("{}", e),
        },
        None => warn!("key {:?} does not hold an array", args.key),
    }

    let tree = JsonNode::from_json(&args.json)?;
    match tree.get(args.key.as_str()).get(args.index).get_value() {
        Ok(v) => info!("tree lookup: {}", v),
        Err(e) => info!("tree lookup: {}", e),
    }

    let json: serde_json::Value = serde_json::from_str(&args.json)?;
    let generic = refract_dict::to_value(&json)?;
    println!("{}", show(&generic)?);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging: RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("refract demo v{}", env!("CARGO_PKG_VERSION"));

    records()?;
    native_ints()?;
    dictionaries(&args)?;
    Ok(())
}
