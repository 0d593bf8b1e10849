#[inline(never)]
pub fn hash64_standard(bytes: &[u8]) -> u64 {
    murmur3_token::hash64(bytes)
}

#[inline(never)]
pub fn hash64_cassandra(bytes: &[u8]) -> u64 {
    murmur3_token::cassandra::hash64(bytes)
}

#[inline(never)]
pub fn create_token(bytes: &[u8]) -> i64 {
    murmur3_token::Murmur3Partitioner.create_token(bytes).0
}

#[inline(never)]
pub fn rapidhash(bytes: &[u8], seed: u64) -> u64 {
    rapidhash::rapidhash_inline(bytes, seed)
}
