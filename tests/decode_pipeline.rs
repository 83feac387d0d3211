//! End-to-end decode pipeline
//!
//! Drives the block-import path the way a worker would: raw witness hex in,
//! miner address out, then difficulty and fees for the same block.

use async_trait::async_trait;
use ckb_explorer_core::config::ScriptConstants;
use ckb_explorer_core::dao::{
    transaction_fee, DepositCell, DepositResolver, TransactionSummary, WithdrawOracle,
    WithdrawingCell,
};
use ckb_explorer_core::{address, compact, reward, witness};
use ckb_explorer_core::{
    Byte32, Capacity, Error, HashType, Network, OutPoint, Result, RewardBreakdown, Script,
};
use primitive_types::U256;

fn miner_script() -> Script {
    Script::new(
        ScriptConstants::default().secp_sighash,
        HashType::Type,
        vec![0x36, 0xc3, 0x29, 0xed, 0x63, 0x0d, 0x6c, 0xe7, 0x50, 0x71, 0x2a, 0x47, 0x75, 0x43,
             0x67, 0x2a, 0xda, 0xb5, 0x7f, 0x4c],
    )
}

struct TableDeposits(Vec<DepositCell>);

impl DepositResolver for TableDeposits {
    fn resolve_deposit(&self, withdrawing: &WithdrawingCell) -> Result<DepositCell> {
        self.0
            .get(withdrawing.cell_index as usize)
            .cloned()
            .ok_or_else(|| Error::data("unknown withdrawing cell"))
    }
}

struct ScriptedOracle {
    answers: Vec<Result<Capacity>>,
}

#[async_trait]
impl WithdrawOracle for ScriptedOracle {
    async fn max_withdraw(&self, deposit: &OutPoint, _: &Byte32) -> Result<Capacity> {
        match &self.answers[deposit.index as usize] {
            Ok(capacity) => Ok(*capacity),
            Err(_) => Err(Error::rpc(-32000, "node is syncing")),
        }
    }
}

#[test]
fn witness_hex_to_miner_address() {
    let script = miner_script();
    let witness_bytes = witness::serialize_cellbase_witness(&script, b"explorer test");
    let witness_hex = format!("0x{}", hex::encode(&witness_bytes));

    let constants = ScriptConstants::default();
    let witnesses = vec![witness_hex];

    let mainnet = address::miner_address(&witnesses, Network::Mainnet, &constants)
        .unwrap()
        .unwrap();
    assert!(mainnet.starts_with("ckb1"));

    let testnet = address::miner_address(&witnesses, Network::Testnet, &constants)
        .unwrap()
        .unwrap();
    assert!(testnet.starts_with("ckt1"));
    assert_ne!(mainnet, testnet);

    // A block without witnesses has no miner info, which is not an error
    assert_eq!(
        address::miner_address(&[], Network::Mainnet, &constants).unwrap(),
        None
    );
}

#[test]
fn parsed_script_survives_reserialization() {
    let script = miner_script();
    let witness_bytes = witness::serialize_cellbase_witness(&script, &[]);
    let parsed = witness::parse_cellbase_witness_bytes(&witness_bytes).unwrap();
    assert_eq!(parsed, script);
    assert_eq!(parsed.hash(), script.hash());
}

#[test]
fn header_fields_to_block_economics() {
    // Difficulty from the header's compact target
    let difficulty = compact::compact_to_difficulty(0x0401_0000);
    assert_eq!(difficulty, U256::one() << 232);

    // Epoch parameters from the packed header field
    let epoch_field = 2u64 | (5u64 << 24) | (1000u64 << 40);
    let epoch = reward::parse_epoch_info(epoch_field, 2005).unwrap();
    assert_eq!(epoch.start_number, 2000);

    // Base reward for a block in that epoch, with issuance on top
    let base = reward::base_reward(2005, &epoch, 1_000_000_250);
    assert_eq!(base, Capacity::shannons(1_000_001));

    let breakdown = RewardBreakdown {
        primary: Capacity::shannons(250_000),
        secondary: Capacity::shannons(30_000),
    };
    assert_eq!(
        reward::block_reward(2005, &breakdown),
        Capacity::shannons(280_000)
    );
}

#[tokio::test]
async fn fees_across_a_mixed_batch() {
    let deposits = TableDeposits(vec![
        DepositCell {
            out_point: OutPoint::new(Byte32::new([0xaa; 32]), 0),
            capacity: Capacity::shannons(100_000_000_000),
        },
        DepositCell {
            out_point: OutPoint::new(Byte32::new([0xbb; 32]), 1),
            capacity: Capacity::shannons(200_000_000_000),
        },
    ]);
    let oracle = ScriptedOracle {
        answers: vec![
            Ok(Capacity::shannons(100_000_000_400)),
            Err(Error::rpc(-32000, "node is syncing")),
        ],
    };

    let block_hash = Byte32::new([0x99; 32]);
    let dao_tx = TransactionSummary {
        input_capacity: Capacity::shannons(300_000_000_000),
        output_capacity: Capacity::shannons(299_999_999_000),
        withdrawing_cells: vec![
            WithdrawingCell {
                cell_index: 0,
                block_hash,
            },
            WithdrawingCell {
                cell_index: 1,
                block_hash,
            },
        ],
    };

    // First cell earns 400 interest; second falls back to zero on the
    // failed oracle call instead of failing the batch
    let fee = transaction_fee(&dao_tx, &deposits, &oracle).await.unwrap();
    assert_eq!(fee, 1000 + 400);

    let plain_tx = TransactionSummary {
        input_capacity: Capacity::shannons(1000),
        output_capacity: Capacity::shannons(900),
        withdrawing_cells: vec![],
    };
    assert_eq!(
        transaction_fee(&plain_tx, &deposits, &oracle).await.unwrap(),
        100
    );
}
