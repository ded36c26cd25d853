use std::sync::Arc;

use proptest::prelude::*;

use nfcservice::constants::{EXTRA_ATQA, EXTRA_HILAYER_RESPONSE, EXTRA_HISTORICAL_BYTES};
use nfcservice::host::{MockTagHost, TagHost};
use nfcservice::tag::{ExtraValue, Extras, IsoDepTag, NfcATag, TagDispatcher};
use nfcservice::TagTechnology;

fn extra_value() -> impl Strategy<Value = ExtraValue> {
    prop_oneof![
        ".*".prop_map(ExtraValue::Text),
        proptest::collection::vec(any::<u8>(), 0..32).prop_map(ExtraValue::Bytes),
        any::<i32>().prop_map(ExtraValue::Int),
    ]
}

proptest! {
    #[test]
    fn arbitrary_extras_never_break_sessions(
        historical in extra_value(),
        hi_layer in extra_value(),
        atqa in extra_value(),
    ) {
        let raw: Arc<dyn TagHost> = Arc::new(
            MockTagHost::new(&[0x01])
                .with_tech_extras(
                    TagTechnology::IsoDep,
                    Extras::new()
                        .with(EXTRA_HISTORICAL_BYTES, historical)
                        .with(EXTRA_HILAYER_RESPONSE, hi_layer),
                )
                .with_tech_extras(TagTechnology::NfcA, Extras::new().with(EXTRA_ATQA, atqa)),
        );
        let dispatcher = TagDispatcher::new();
        let tag = dispatcher.dispatch(&raw);

        let iso = dispatcher.session::<IsoDepTag>(&tag);
        prop_assert!(iso.is_some());
        let iso = iso.unwrap();
        let _ = iso.historical_bytes();
        let _ = iso.hi_layer_response();

        let nfca = dispatcher.session::<NfcATag>(&tag);
        prop_assert!(nfca.is_some());
        let atqa = nfca.unwrap().atqa();
        prop_assert!(atqa.len() % 2 == 0);
        prop_assert!(atqa.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn byte_extras_render_as_lowercase_hex(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
        let extras = Extras::new().with("k", ExtraValue::Bytes(bytes.clone()));
        prop_assert_eq!(extras.get_string("k"), hex::encode(&bytes));
    }
}
