#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::{Integer, Mode, Tag, Template};
use bertree::encode::{PrimitiveContent, Values};

macro_rules! decode_native {
    ( $data:expr, $fn:ident ) => {{
        let _ = Mode::Ber.decode($data, |cons| {
            cons.take_primitive_if(Tag::INTEGER, Integer::$fn)
        });
    }}
}

fuzz_target!(|data: &[u8]| {
    let ber = Mode::Ber.decode(data, Integer::take_from);
    let der = Mode::Der.decode(data, Integer::take_from);
    if let Ok(der) = der.as_ref() {
        assert_eq!(der.encode().to_vec(), data);
        assert_eq!(ber.as_ref().ok(), Some(der));
    }

    let value = Template::Integer.decode(data, Mode::Ber);
    assert_eq!(value.is_ok(), ber.is_ok());

    decode_native!(data, i64_from_primitive);
    decode_native!(data, u64_from_primitive);
});
