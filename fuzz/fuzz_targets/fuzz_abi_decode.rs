#![no_main]

use libfuzzer_sys::fuzz_target;
use tokend_types::abi;
use tokend_types::{Action, Asset, Name, Symbol};

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes should return an error, never panic
    if let Ok(name) = abi::decode::<Name>(data) {
        assert_eq!(abi::encode(&name), data);
    }
    if let Ok(symbol) = abi::decode::<Symbol>(data) {
        let again: Symbol = abi::decode(&abi::encode(&symbol)).expect("re-decode symbol");
        assert_eq!(again, symbol);
    }
    if let Ok(asset) = abi::decode::<Asset>(data) {
        let again: Asset = abi::decode(&abi::encode(&asset)).expect("re-decode asset");
        assert_eq!(again, asset);
    }
    if let Ok(action) = abi::decode::<Action>(data) {
        let again: Action = abi::decode(&abi::encode(&action)).expect("re-decode action");
        assert_eq!(again, action);
    }
});
