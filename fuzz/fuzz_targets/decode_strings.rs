#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::decode::Options;
use bertree::string::{
    BitString, BmpString, Ia5String, OctetString, PrintableString,
    TeletexString, UniversalString, Utf8String,
};
use bertree::{GeneralizedTime, Mode, UtcTime};

macro_rules! decode_strings {
    ( $data:expr, [ $( $mode:ident ),* ] ) => {{
        $(
            let options = Options::from(Mode::$mode);
            if let Ok(take) = options.decode($data, BitString::take_from) {
                assert!(take.unused() < 8);
                assert!(take.octet_len() > 0 || take.unused() == 0);
            }

            let _ = options.decode($data, OctetString::take_from);
            let _ = options.decode($data, OctetString::take_opt_from);
            let _ = options.decode($data, Utf8String::take_from);
            let _ = options.decode($data, TeletexString::take_from);
            let _ = options.decode($data, UniversalString::take_from);
            let _ = options.decode($data, BmpString::take_from);
            let _ = options.decode($data, Ia5String::take_from);
            let _ = options.decode($data, UtcTime::take_from);
            let _ = options.decode($data, GeneralizedTime::take_from);

            let lenient = options.decode($data, PrintableString::take_from);
            let strict = options.strict().decode(
                $data, PrintableString::take_from
            );
            if strict.is_ok() {
                assert_eq!(lenient.ok(), strict.ok());
            }
        )*
    }}
}

fuzz_target!(|data: &[u8]| {
    decode_strings!(data, [Ber, Der]);
});
