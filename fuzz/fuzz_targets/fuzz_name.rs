#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use tokend_types::Name;

#[derive(Debug, Arbitrary)]
struct NameInput {
    text: String,
    raw: u64,
}

fuzz_target!(|input: NameInput| {
    // Parsing arbitrary text should never panic
    if let Ok(name) = Name::new(&input.text) {
        assert_eq!(name.to_string(), input.text, "Name text round-trip failed");
        assert_eq!(Name::from_raw(name.raw()), name);
    }

    // Every raw value renders to text that parses back to itself
    let name = Name::from_raw(input.raw);
    let text = name.to_string();
    let reparsed = Name::new(&text).expect("rendered name should parse");
    assert_eq!(reparsed.raw(), input.raw, "Name raw round-trip failed");
});
