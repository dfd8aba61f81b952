use ethers::prelude::*;
use prior_project::client::{RouterCall, SELECTOR_SWAP_TO_USDC, SELECTOR_SWAP_TO_USDT};
use prior_project::swap::{swap_amount, SwapTarget, SWAP_CEILING_WEI};

#[test]
fn amount_is_capped_by_the_fixed_ceiling() {
    // 1 PRIOR: 80% of it is far above the 0.005 ceiling
    assert_eq!(swap_amount(U256::exp10(18)), SWAP_CEILING_WEI);
}

#[test]
fn amount_is_capped_by_the_safety_fraction() {
    // tiny balance: 4/5 of it, exact integer math
    assert_eq!(swap_amount(U256::from(1_000_000u64)), U256::from(800_000u64));
    assert_eq!(swap_amount(U256::zero()), U256::zero());
}

#[test]
fn amount_never_exceeds_either_bound() {
    let balances = [
        U256::from(1u64),
        U256::from(12_345u64),
        U256::exp10(15),
        U256::exp10(18),
        U256::exp10(21),
    ];
    for balance in balances {
        let amount = swap_amount(balance);
        assert!(amount <= SWAP_CEILING_WEI);
        // amount <= balance * 4/5
        assert!(amount * U256::from(5) <= balance * U256::from(4));
    }
}

#[test]
fn targets_alternate_usdc_then_usdt() {
    for cycle in 1u32..=10 {
        let expected = if cycle % 2 == 1 {
            SwapTarget::Usdc
        } else {
            SwapTarget::Usdt
        };
        assert_eq!(SwapTarget::for_cycle(cycle), expected);
    }
}

#[test]
fn router_calldata_is_selector_plus_amount_word() {
    let amount = U256::from(123_456_789u64);
    let data = RouterCall::swap_prior_to_usdc(amount).calldata();

    assert_eq!(data.len(), 36);
    assert_eq!(&data[..4], &SELECTOR_SWAP_TO_USDC);
    assert_eq!(U256::from_big_endian(&data[4..]), amount);
}

#[test]
fn the_two_router_variants_use_distinct_selectors() {
    let usdc = SwapTarget::Usdc.call(U256::one()).calldata();
    let usdt = SwapTarget::Usdt.call(U256::one()).calldata();

    assert_eq!(&usdc[..4], &SELECTOR_SWAP_TO_USDC);
    assert_eq!(&usdt[..4], &SELECTOR_SWAP_TO_USDT);
    assert_ne!(&usdc[..4], &usdt[..4]);
    // same argument encoding on both variants
    assert_eq!(&usdc[4..], &usdt[4..]);
}
