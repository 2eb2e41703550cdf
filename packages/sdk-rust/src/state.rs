//! On-chain account deserialization.
//!
//! Parses raw account bytes for `Pool` (118 bytes) and `Position` (89 bytes).
//! Byte offsets mirror the Anchor `#[account]` layout exactly.

use serde::Serialize;
use solana_sdk::{hash::hash, pubkey::Pubkey};
use crate::error::{Error, Result};

// ─── Asset ────────────────────────────────────────────────────────────────────

/// One side of the pair, in the pool's stored mint order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Asset {
    A,
    B,
}

impl Asset {
    pub fn other(self) -> Asset {
        match self {
            Asset::A => Asset::B,
            Asset::B => Asset::A,
        }
    }
}

// ─── Pool ─────────────────────────────────────────────────────────────────────

pub const POOL_ACCOUNT_LEN: usize = 118;
pub const POSITION_ACCOUNT_LEN: usize = 89;

/// Deserialized `Pool` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// mint_a(32)  mint_b(32)  reserve_a(8)  reserve_b(8)
/// total_a_deposited(8)  total_b_deposited(8)  fees_collected_quote(8)
/// fee_rate_bps(2)  ratio_tolerance_bps(2)  quote(1)  bump(1)  = 118 bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolState {
    pub mint_a:               Pubkey,
    pub mint_b:               Pubkey,
    pub reserve_a:            u64,
    pub reserve_b:            u64,
    pub total_a_deposited:    u64,
    pub total_b_deposited:    u64,
    pub fees_collected_quote: u64,
    pub fee_rate_bps:         u16,
    pub ratio_tolerance_bps:  u16,
    /// Asset whose swap-input fees are tallied in `fees_collected_quote`.
    pub quote:                Asset,
}

impl PoolState {
    pub fn is_empty(&self) -> bool {
        self.reserve_a == 0 && self.reserve_b == 0
    }

    pub fn asset_of(&self, mint: &Pubkey) -> Option<Asset> {
        if *mint == self.mint_a {
            Some(Asset::A)
        } else if *mint == self.mint_b {
            Some(Asset::B)
        } else {
            None
        }
    }

    pub fn reserve(&self, asset: Asset) -> u64 {
        match asset {
            Asset::A => self.reserve_a,
            Asset::B => self.reserve_b,
        }
    }

    pub fn mint(&self, asset: Asset) -> Pubkey {
        match asset {
            Asset::A => self.mint_a,
            Asset::B => self.mint_b,
        }
    }
}

/// Deserialize a `Pool` account from raw bytes.
pub fn parse_pool(data: &[u8]) -> Result<PoolState> {
    check_account(data, "Pool", POOL_ACCOUNT_LEN)?;
    let quote = match data[116] {
        0 => Asset::A,
        1 => Asset::B,
        other => {
            return Err(Error::ParseError {
                offset: 116,
                reason: format!("invalid quote asset tag {other}"),
            })
        }
    };
    Ok(PoolState {
        mint_a:               read_pubkey(data, 8)?,
        mint_b:               read_pubkey(data, 40)?,
        reserve_a:            read_u64(data, 72)?,
        reserve_b:            read_u64(data, 80)?,
        total_a_deposited:    read_u64(data, 88)?,
        total_b_deposited:    read_u64(data, 96)?,
        fees_collected_quote: read_u64(data, 104)?,
        fee_rate_bps:         read_u16(data, 112)?,
        ratio_tolerance_bps:  read_u16(data, 114)?,
        quote,
    })
}

// ─── Position ─────────────────────────────────────────────────────────────────

/// Deserialized `Position` account state.
///
/// Layout (after 8-byte Anchor discriminator):
/// ```text
/// owner(32)  pool(32)  asset_a_deposited(8)  asset_b_deposited(8)  bump(1)
/// = 89 bytes
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionState {
    pub owner:             Pubkey,
    pub pool:              Pubkey,
    pub asset_a_deposited: u64,
    pub asset_b_deposited: u64,
}

impl PositionState {
    pub fn is_open(&self) -> bool {
        self.asset_a_deposited > 0 || self.asset_b_deposited > 0
    }
}

/// Deserialize a `Position` account from raw bytes.
pub fn parse_position(data: &[u8]) -> Result<PositionState> {
    check_account(data, "Position", POSITION_ACCOUNT_LEN)?;
    Ok(PositionState {
        owner:             read_pubkey(data, 8)?,
        pool:              read_pubkey(data, 40)?,
        asset_a_deposited: read_u64(data, 72)?,
        asset_b_deposited: read_u64(data, 80)?,
    })
}

// ─── SPL token account ────────────────────────────────────────────────────────

/// Read the `amount` field from a packed SPL token account.
///
/// Token account layout: `mint(32) owner(32) amount(8) …`
pub fn parse_token_amount(data: &[u8]) -> Result<u64> {
    if data.len() < 72 {
        return Err(Error::ParseError {
            offset: 64,
            reason: format!("Token account is {} bytes; need at least 72", data.len()),
        });
    }
    read_u64(data, 64)
}

// ─── Discriminator ────────────────────────────────────────────────────────────

/// Anchor account discriminator: `sha256("account:{TypeName}")[..8]`.
pub fn account_discriminator(type_name: &str) -> [u8; 8] {
    let h = hash(format!("account:{type_name}").as_bytes());
    let mut d = [0u8; 8];
    d.copy_from_slice(&h.to_bytes()[..8]);
    d
}

fn check_account(data: &[u8], type_name: &str, expected: usize) -> Result<()> {
    if data.len() < expected {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("{type_name} account is {} bytes; expected {expected}", data.len()),
        });
    }
    if data[..8] != account_discriminator(type_name) {
        return Err(Error::ParseError {
            offset: 0,
            reason: format!("discriminator does not match {type_name}"),
        });
    }
    Ok(())
}

// ─── Byte-slice primitives ────────────────────────────────────────────────────

fn field<const N: usize>(data: &[u8], offset: usize, what: &str) -> Result<[u8; N]> {
    data.get(offset..offset + N)
        .and_then(|s| s.try_into().ok())
        .ok_or_else(|| Error::ParseError {
            offset,
            reason: format!("slice too short for {what} ({N} bytes)"),
        })
}

pub(crate) fn read_pubkey(data: &[u8], offset: usize) -> Result<Pubkey> {
    Ok(Pubkey::from(field::<32>(data, offset, "Pubkey")?))
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    Ok(u16::from_le_bytes(field(data, offset, "u16")?))
}

pub(crate) fn read_u64(data: &[u8], offset: usize) -> Result<u64> {
    Ok(u64::from_le_bytes(field(data, offset, "u64")?))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Encode a pool account the way Anchor lays it out on-chain.
    pub(crate) fn pool_bytes(pool: &PoolState) -> Vec<u8> {
        let mut data = account_discriminator("Pool").to_vec();
        data.extend_from_slice(pool.mint_a.as_ref());
        data.extend_from_slice(pool.mint_b.as_ref());
        for v in [
            pool.reserve_a,
            pool.reserve_b,
            pool.total_a_deposited,
            pool.total_b_deposited,
            pool.fees_collected_quote,
        ] {
            data.extend_from_slice(&v.to_le_bytes());
        }
        data.extend_from_slice(&pool.fee_rate_bps.to_le_bytes());
        data.extend_from_slice(&pool.ratio_tolerance_bps.to_le_bytes());
        data.push(match pool.quote {
            Asset::A => 0,
            Asset::B => 1,
        });
        data.push(254); // bump
        data
    }

    pub(crate) fn sample_pool() -> PoolState {
        PoolState {
            mint_a:               Pubkey::new_unique(),
            mint_b:               Pubkey::new_unique(),
            reserve_a:            1_500,
            reserve_b:            14,
            total_a_deposited:    1_000,
            total_b_deposited:    20,
            fees_collected_quote: 1,
            fee_rate_bps:         30,
            ratio_tolerance_bps:  100,
            quote:                Asset::A,
        }
    }

    #[test]
    fn pool_round_trips_through_account_layout() {
        let pool = sample_pool();
        let data = pool_bytes(&pool);
        assert_eq!(data.len(), POOL_ACCOUNT_LEN);
        assert_eq!(parse_pool(&data).unwrap(), pool);
    }

    #[test]
    fn pool_rejects_short_or_foreign_accounts() {
        let data = pool_bytes(&sample_pool());
        assert!(matches!(
            parse_pool(&data[..100]),
            Err(Error::ParseError { offset: 0, .. })
        ));

        let mut foreign = data.clone();
        foreign[..8].copy_from_slice(&account_discriminator("Position"));
        assert!(parse_pool(&foreign).is_err());

        let mut bad_quote = data;
        bad_quote[116] = 7;
        assert!(matches!(
            parse_pool(&bad_quote),
            Err(Error::ParseError { offset: 116, .. })
        ));
    }

    #[test]
    fn position_decodes_at_fixed_offsets() {
        let owner = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let mut data = account_discriminator("Position").to_vec();
        data.extend_from_slice(owner.as_ref());
        data.extend_from_slice(pool.as_ref());
        data.extend_from_slice(&600u64.to_le_bytes());
        data.extend_from_slice(&12u64.to_le_bytes());
        data.push(255);
        assert_eq!(data.len(), POSITION_ACCOUNT_LEN);

        let position = parse_position(&data).unwrap();
        assert_eq!(position.owner, owner);
        assert_eq!(position.pool, pool);
        assert_eq!((position.asset_a_deposited, position.asset_b_deposited), (600, 12));
        assert!(position.is_open());
    }

    #[test]
    fn token_amount_reads_offset_64() {
        let mut data = vec![0u8; 165];
        data[64..72].copy_from_slice(&42u64.to_le_bytes());
        assert_eq!(parse_token_amount(&data).unwrap(), 42);
        assert!(parse_token_amount(&data[..70]).is_err());
    }
}
