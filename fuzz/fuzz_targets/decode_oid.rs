#![no_main]

use libfuzzer_sys::fuzz_target;
use bertree::{Mode, Oid};
use bertree::encode::{PrimitiveContent, Values};

fuzz_target!(|data: &[u8]| {
    let take = Mode::Ber.decode(data, Oid::take_from);
    let opt = Mode::Ber.decode(data, Oid::take_opt_from);
    assert_eq!(take.is_ok(), matches!(opt, Ok(Some(_))));

    if let Ok(der) = Mode::Der.decode(data, Oid::take_from) {
        assert_eq!(der.encode().to_vec(), data);
    }

    if let Ok(take) = take {
        let reparsed: Oid = take.to_string().parse().unwrap();
        assert_eq!(reparsed, take);
        assert!(Mode::Ber.decode(data, |cons| take.skip_if(cons)).is_ok());
    }
});
