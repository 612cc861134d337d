#![no_main]

use libfuzzer_sys::fuzz_target;
use arbitrary::Arbitrary;
use tokend_types::{AmountInput, Asset, Symbol, MAX_AMOUNT};

#[derive(Debug, Arbitrary)]
struct AssetInput {
    text: String,
    units: i64,
    value: f64,
    precision: u8,
}

fuzz_target!(|input: AssetInput| {
    // Parsing arbitrary text should never panic
    if let Ok(asset) = input.text.parse::<Asset>() {
        let reparsed: Asset = asset.to_string().parse().expect("rendered asset should parse");
        assert_eq!(reparsed, asset, "Asset text round-trip failed");
        assert!(asset.units().unsigned_abs() <= MAX_AMOUNT as u64);
    }

    let symbol = match Symbol::new(input.precision, "TKN".parse().expect("valid code")) {
        Ok(symbol) => symbol,
        Err(_) => return,
    };

    // Units are accepted only inside the amount range
    match Asset::from_units(input.units, symbol) {
        Ok(asset) => assert_eq!(asset.units(), input.units),
        Err(_) => assert!(input.units.unsigned_abs() > MAX_AMOUNT as u64),
    }

    // Float conversion should reject rather than panic
    if let Ok(asset) = AmountInput::from(input.value).resolve(symbol) {
        assert!(input.value.is_finite());
        assert_eq!(asset.symbol(), symbol);
    }
});
