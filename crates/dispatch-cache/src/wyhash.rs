//! A small Wyhash-compatible 64-bit hash, used for `table_hash` in the
//! `.jdc` format (narrower contract than BLAKE3's 32-byte content id,
//! which this workspace uses for `CacheKey` instead).

const SECRET: u64 = 0x8bb8_4b93_962e_acc9;
const SEED_XOR: u64 = 0x2d35_8dcc_aa6c_78a5;

fn wymum(a: u64, b: u64) -> u64 {
    let r = u128::from(a) * u128::from(b);
    ((r >> 64) as u64) ^ (r as u64)
}

/// Hashes `data` to a 64-bit digest. Deterministic across runs and
/// platforms (no reliance on `RandomState`/`SipHash`), which is required
/// since `table_hash` is persisted to disk and compared across process
/// invocations.
#[must_use]
pub fn wyhash64(data: &[u8], seed: u64) -> u64 {
    let mut state = seed ^ SEED_XOR;
    let mut rest = data;
    while rest.len() >= 8 {
        let (chunk, tail) = rest.split_at(8);
        let word = u64::from_le_bytes(chunk.try_into().unwrap());
        state = wymum(state ^ word, SECRET);
        rest = tail;
    }
    let mut tail_word: u64 = 0;
    for (i, &byte) in rest.iter().enumerate() {
        tail_word |= u64::from(byte) << (8 * i);
    }
    wymum(state ^ tail_word, (rest.len() as u64) ^ SECRET)
}
