//! Tests for the record stores

#[cfg(test)]
mod tests {
    use crate::{
        error::RegistryError,
        registry::Registry,
        state::{Collections, MemoryStore, SqliteStore, Store, Write},
        types::*,
    };
    use tempfile::TempDir;

    fn hive(id: &str, current: f64) -> Hive {
        Hive {
            id: id.to_string(),
            beekeeper_id: "bk-1".to_string(),
            beekeeper: Caller::from_low_u64_be(1),
            location: "Njoro".to_string(),
            installation_date: "2025-01-15".to_string(),
            status: HiveStatus::Maintenance,
            estimated_yield: 20.0,
            current_investment: current,
            target_investment: 500.0,
            investors: vec!["inv-1".to_string()],
            honey_batches: vec![],
            carbon_credits: vec![],
            created_at: "2025-01-15T08:00:00.000Z".to_string(),
            updated_at: "2025-01-15T08:00:00.000Z".to_string(),
        }
    }

    async fn open_store(dir: &TempDir) -> SqliteStore {
        let db_path = dir.path().join("registry.db");
        let url = format!("sqlite:{}?mode=rwc", db_path.display());
        SqliteStore::open(&url).await.unwrap()
    }

    #[test]
    fn test_apply_overwrites_in_place() {
        let mut collections = Collections::new();
        collections.apply(Write::Hive(hive("h-1", 0.0)));
        collections.apply(Write::Hive(hive("h-1", 250.0)));

        assert_eq!(collections.hives.len(), 1);
        assert_eq!(collections.hives["h-1"].current_investment, 250.0);
        assert_eq!(collections.record_count(), 1);
    }

    #[test]
    fn test_collections_iterate_in_key_order() {
        let mut collections = Collections::new();
        for id in ["c", "a", "b"] {
            collections.apply(Write::Hive(hive(id, 0.0)));
        }
        let ids: Vec<&str> = collections.hives.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_decode_uses_wire_field_names() {
        let write = Write::Hive(hive("h-1", 10.0));
        let body = write.encode().unwrap();
        assert!(body.contains("\"currentInvestment\":10.0"));
        assert!(body.contains("\"status\":\"Maintenance\""));

        assert_eq!(Write::decode("hives", &body).unwrap(), write);
        assert!(matches!(
            Write::decode("bees", &body),
            Err(RegistryError::SystemError(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_store_applies_whole_set() {
        let mut store = MemoryStore::new();
        store
            .commit(vec![Write::Hive(hive("h-1", 0.0)), Write::Hive(hive("h-2", 0.0))])
            .await
            .unwrap();
        assert_eq!(store.collections().hives.len(), 2);
    }

    #[tokio::test]
    async fn test_sqlite_store_reloads_committed_records() {
        let dir = TempDir::new().unwrap();

        let store = open_store(&dir).await;
        let mut registry = Registry::new(store).unwrap();
        let keeper = Caller::from_low_u64_be(7);
        let investor = Caller::from_low_u64_be(8);

        registry
            .create_beekeeper_profile(
                keeper,
                BeekeeperProfilePayload {
                    first_name: "Achieng".to_string(),
                    last_name: "Odhiambo".to_string(),
                    email: "achieng@example.com".to_string(),
                    phone_number: "+254711000000".to_string(),
                    county: "Kitui".to_string(),
                    location: "Mwingi".to_string(),
                    years_of_experience: 3,
                    certifications: vec![],
                },
            )
            .await
            .unwrap();
        registry
            .create_investor_profile(
                investor,
                InvestorProfilePayload {
                    first_name: "Baraka".to_string(),
                    last_name: "Kiprop".to_string(),
                    email: "baraka@example.com".to_string(),
                    phone_number: "+254722000000".to_string(),
                    location: "Eldoret".to_string(),
                    investor_type: "Fund".to_string(),
                },
            )
            .await
            .unwrap();
        let created = registry
            .create_hive(
                keeper,
                HivePayload {
                    location: "Mwingi".to_string(),
                    installation_date: "2025-03-01".to_string(),
                    estimated_yield: 15.0,
                    target_investment: 300.0,
                },
            )
            .await
            .unwrap();
        registry
            .create_investment(
                investor,
                InvestmentPayload {
                    hive_id: created.id.clone(),
                    amount: 120.0,
                    expected_return: 8.0,
                    maturity_date: None,
                },
            )
            .await
            .unwrap();

        let snapshot = registry.collections().clone();
        registry.store().close().await;
        drop(registry);

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.collections(), &snapshot);
        assert_eq!(reopened.collections().hives[&created.id].current_investment, 120.0);
        assert_eq!(reopened.collections().beekeepers.values().next().unwrap().total_hives, 1);
    }

    #[tokio::test]
    async fn test_rejected_overflow_keeps_database_loadable() {
        let dir = TempDir::new().unwrap();
        let mut registry = Registry::new(open_store(&dir).await).unwrap();
        let keeper = Caller::from_low_u64_be(7);

        registry
            .create_beekeeper_profile(
                keeper,
                BeekeeperProfilePayload {
                    first_name: "Achieng".to_string(),
                    last_name: "Odhiambo".to_string(),
                    email: "achieng@example.com".to_string(),
                    phone_number: "+254711000000".to_string(),
                    county: "Kitui".to_string(),
                    location: "Mwingi".to_string(),
                    years_of_experience: 3,
                    certifications: vec![],
                },
            )
            .await
            .unwrap();
        let hive = registry
            .create_hive(
                keeper,
                HivePayload {
                    location: "Mwingi".to_string(),
                    installation_date: "2025-03-01".to_string(),
                    estimated_yield: 15.0,
                    target_investment: 300.0,
                },
            )
            .await
            .unwrap();

        let batch = |quantity: f64| HoneyBatchPayload {
            hive_id: hive.id.clone(),
            harvest_date: "2025-04-01".to_string(),
            quantity,
            quality: BatchQuality::Standard,
            quality_score: 70,
            location: "Mwingi".to_string(),
            price_per_kg: None,
        };
        registry.create_honey_batch(keeper, batch(1e308)).await.unwrap();
        let result = registry.create_honey_batch(keeper, batch(1e308)).await;
        assert!(matches!(result, Err(RegistryError::InvalidPayload(_))));

        let snapshot = registry.collections().clone();
        registry.store().close().await;
        drop(registry);

        let reopened = open_store(&dir).await;
        assert_eq!(reopened.collections(), &snapshot);
        let beekeeper = reopened.collections().beekeepers.values().next().unwrap();
        assert_eq!(beekeeper.total_honey_produced, 1e308);
        assert_eq!(beekeeper.total_batches, 1);
    }
}
