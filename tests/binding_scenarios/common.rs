//! Shared domain types and helpers

#![allow(dead_code)]

pub use jsonbind::prelude::*;
pub use jsonbind::{
    bind_enum, bind_record, DateTimeBinding, DateTimeFormat, EnumValueBinding, NotFoundBehavior,
    TypeKey,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

bind_record!(Point { x: i64, y: i64 });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point3 {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

bind_record!(Point3: Point { x: i64, y: i64, z: i64 });

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape2 {
    pub name: String,
    pub vertices: TypedList<Point>,
    pub closed: bool,
}

bind_record!(Shape2 { name: String, vertices: TypedList<Point>, closed: bool });

bind_enum! {
    pub enum Color {
        Red => "r",
        Green => "g",
    }
}

bind_enum! {
    pub enum Flag {
        On => true,
        Count => 135,
    }
}

/// A fresh engine with the standard bindings, isolated from the
/// process-wide one
pub fn engine() -> Engine {
    init_tracing();
    Engine::new()
}

/// Route binding logs to the test writer (visible with `--nocapture`)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn ints(values: &[i64]) -> TypedList<i64> {
    TypedList::from_items(values.iter().copied()).unwrap()
}
