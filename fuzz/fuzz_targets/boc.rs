#![no_main]

use cellscope::{disassembler::disassemble, Boc};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(boc) = Boc::from_slice(data) {
        for root in boc.roots() {
            let _ = disassemble(root);
        }
    }
});
