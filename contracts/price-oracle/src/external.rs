use concordium_std::*;

#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Number of decimals in every answer of this feed.
    pub decimals: u8,
    /// First answer, USD per CCD scaled by `10^decimals`.
    pub answer: u64,
}
