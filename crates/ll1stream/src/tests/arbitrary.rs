use alloc::string::String;

use quickcheck::{Arbitrary, Gen};

use crate::{Array, Map, Value};

#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct JsonNumber(f64);

impl Arbitrary for JsonNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }

        Self(value)
    }
}

impl Arbitrary for Value {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            let cases = if depth == 0 { 4 } else { 6 };
            match usize::arbitrary(g) % cases {
                0 => Value::Null,
                1 => Value::Boolean(bool::arbitrary(g)),
                2 => Value::Number(JsonNumber::arbitrary(g).0),
                3 => Value::String(String::arbitrary(g)),
                4 => {
                    let len = usize::arbitrary(g) % 4;
                    let mut vec = Array::new();
                    for _ in 0..len {
                        vec.push(gen_val(g, depth - 1));
                    }
                    Value::Array(vec)
                }
                _ => {
                    let len = usize::arbitrary(g) % 4;
                    let mut map = Map::new();
                    for _ in 0..len {
                        map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                    }
                    Value::Object(map)
                }
            }
        }

        let depth = usize::arbitrary(g) % 4;
        gen_val(g, depth)
    }

    fn shrink(&self) -> alloc::boxed::Box<dyn Iterator<Item = Self>> {
        match self {
            Value::Array(items) => {
                alloc::boxed::Box::new(items.shrink().map(Value::Array).chain(items.clone()))
            }
            Value::Object(map) => {
                let children: Array = map.values().cloned().collect();
                alloc::boxed::Box::new(children.into_iter())
            }
            Value::String(s) => alloc::boxed::Box::new(s.shrink().map(Value::String)),
            _ => quickcheck::empty_shrinker(),
        }
    }
}
