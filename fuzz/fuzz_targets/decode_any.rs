#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::{Any, Mode};
use bertree::encode::Values;

fuzz_target!(|data: &[u8]| {
    let any = match Mode::Ber.decode(data, Any::take_from) {
        Ok(any) => any,
        Err(_) => return
    };
    let encoded = any.encode().to_vec();
    assert_eq!(encoded.len(), any.encode().encoded_len());
    assert_eq!(
        Mode::Ber.decode(encoded.as_slice(), Any::take_from).ok(),
        Some(any.clone())
    );

    if let Ok(value) = any.to_value(Mode::Ber) {
        let _ = value.to_vec();
    }
});
