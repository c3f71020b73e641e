#![no_main]
use libfuzzer_sys::fuzz_target;

// Arbitrary bytes must produce an error or a value, never a panic or a hang.
fuzz_target!(|data: &[u8]| {
    let _ = huffpack::decompress::<u8>(data);
    let _ = huffpack::decompress_str(data);
});
