#![no_main]

use iso8583_codec::field::{
    Alphanumeric, Binary, FieldCodec, LlBinary, LlVar, LllBinary, LllVar, Mti, Numeric,
};
use libfuzzer_sys::fuzz_target;

const DIRECTIVES: [&str; 4] = ["ascii", "ebcdic", "ebcdic/ascii", "ascii/ebcdic"];

fuzz_target!(|data: &[u8]| {
    // First byte picks the directive and declared length; the rest is the wire
    let Some((&selector, wire)) = data.split_first() else {
        return;
    };
    let directive = DIRECTIVES[usize::from(selector & 0x03)];
    let length = usize::from(selector >> 2);

    let _ = LlVar::default().unmarshal(Some(wire), length % 3, directive);
    let _ = LllVar::default().unmarshal(Some(wire), length % 4, directive);
    let _ = LlBinary::default().unmarshal(Some(wire), length % 3, directive);
    let _ = LllBinary::default().unmarshal(Some(wire), length % 4, directive);
    let _ = Mti::default().unmarshal(Some(wire), length % 6, directive);
    let _ = Numeric::default().unmarshal(Some(wire), length, directive);
    let _ = Alphanumeric::default().unmarshal(Some(wire), length, directive);
    let _ = Binary::default().unmarshal(Some(wire), length, directive);
});
