#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(reader) = ctf::CtfReader::from_bytes(data) {
        for ty in reader.iter_types().take(4096) {
            if ty.is_err() {
                break;
            }
        }
        let _ = reader.get_type(1);
    }
});
