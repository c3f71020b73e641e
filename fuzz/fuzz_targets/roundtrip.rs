#![no_main]
use huffpack::{compress, decompress, encode, HuffmanDecoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let encoded = encode(data).unwrap();
    let pad = encoded.payload.padding().unwrap();
    assert!((1..=8).contains(&pad));

    let decoder = HuffmanDecoder::from_table(&encoded.table);
    assert_eq!(decoder.decode(encoded.payload.as_bytes()).unwrap(), data);

    let packed = compress(data).unwrap();
    assert_eq!(decompress::<u8>(&packed).unwrap(), data);
});
