//! Property tests across codec and core.

use linkreg_codec::{AssetLine, UserLine};
use linkreg_core::{KeyComparator, KeyOrder, Registry};
use linkreg_testkit::prelude::*;
use proptest::prelude::*;

fn asset_then_user_lines() -> impl Strategy<Value = (Vec<AssetLine>, Vec<UserLine>)> {
    asset_lines_strategy(24).prop_flat_map(|assets| {
        let hashes: Vec<String> = assets.iter().map(|line| line.hash.clone()).collect();
        (Just(assets), user_lines_strategy(hashes, 12))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operations_match_model(ops in registry_ops_strategy(60)) {
        let mut harness = IntegrationHarness::new();
        harness.run(&ops);
        prop_assert_eq!(harness.registry.assets().len(), harness.tracked_assets());
        let references: usize = harness.registry.users().iter().map(|u| u.owned_count()).sum();
        prop_assert!(references <= harness.registry.assets().len() * harness.registry.users().len());
    }

    #[test]
    fn load_save_load_is_stable((assets, users) in asset_then_user_lines()) {
        let mut registry = Registry::new();
        registry.load_assets_str(&render(&assets)).unwrap();
        registry.load_users_str(&render(&users)).unwrap();
        verify_invariants(&registry);

        let mut saved_assets = Vec::new();
        let mut saved_users = Vec::new();
        registry.write_assets(&mut saved_assets).unwrap();
        registry.write_users(&mut saved_users).unwrap();

        let mut reloaded = Registry::new();
        reloaded.load_assets_str(&String::from_utf8(saved_assets.clone()).unwrap()).unwrap();
        reloaded.load_users_str(&String::from_utf8(saved_users.clone()).unwrap()).unwrap();

        let mut resaved_assets = Vec::new();
        let mut resaved_users = Vec::new();
        reloaded.write_assets(&mut resaved_assets).unwrap();
        reloaded.write_users(&mut resaved_users).unwrap();
        prop_assert_eq!(saved_assets, resaved_assets);
        prop_assert_eq!(saved_users, resaved_users);
        prop_assert_eq!(reloaded.assets().len(), assets.len());
        prop_assert_eq!(reloaded.users().len(), users.len());
    }

    #[test]
    fn assets_sorted_under_either_order(
        assets in asset_lines_strategy(24),
        case_insensitive in any::<bool>(),
    ) {
        let order = if case_insensitive { KeyOrder::CaseInsensitive } else { KeyOrder::Bytewise };
        let mut registry = Registry::with_config(linkreg_core::Config::new().asset_order(order));
        registry.load_assets_str(&render(&assets)).unwrap();

        let hashes: Vec<&str> = registry.assets().iter().map(|a| a.hash()).collect();
        for pair in hashes.windows(2) {
            prop_assert!(order.compare(pair[0], pair[1]).is_lt());
        }
    }

    #[test]
    fn one_bad_line_empties_store(
        assets in asset_lines_strategy(12),
        position in any::<prop::sample::Index>(),
    ) {
        let mut lines: Vec<String> = assets.iter().map(ToString::to_string).collect();
        let at = position.index(lines.len() + 1);
        lines.insert(at, "broken line with too many fields".to_owned());
        let document = lines.join("\n");

        let mut registry = Registry::new();
        prop_assert!(registry.load_assets_str(&document).is_err());
        prop_assert!(registry.assets().is_empty());
    }
}
