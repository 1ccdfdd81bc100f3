//! Integration tests for the RocksDB-backed quote store.

use std::collections::HashMap;

use tempfile::TempDir;

use quote_graph_core::error::CoreError;
use quote_graph_core::traits::{QuoteFilter, QuoteStore};
use quote_graph_core::types::{Quote, SimilarityEdge};
use quote_graph_storage::RocksDbQuoteStore;

fn open_store(dir: &TempDir) -> RocksDbQuoteStore {
    RocksDbQuoteStore::open(dir.path()).expect("open store")
}

#[tokio::test]
async fn author_upsert_is_keyed_by_name() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let first = store.upsert_author("Seneca", None, None).await.unwrap();
    let second = store
        .upsert_author("Seneca", Some("Stoic philosopher"), None)
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.bio.as_deref(), Some("Stoic philosopher"));

    // None fields never clobber existing values.
    let third = store.upsert_author("Seneca", None, None).await.unwrap();
    assert_eq!(third.bio.as_deref(), Some("Stoic philosopher"));

    let found = store.find_author_by_name("Seneca").await.unwrap().unwrap();
    assert_eq!(found.id, first.id);
    assert!(store.find_author_by_name("Epictetus").await.unwrap().is_none());
}

#[tokio::test]
async fn quote_round_trip_with_derived_join() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let author = store.upsert_author("Seneca", None, None).await.unwrap();
    let mut quote = Quote::new("Luck is what happens when preparation meets opportunity.", author.id);
    quote.context = Some("Letters".to_string());
    store.put_quote(&quote).await.unwrap();

    let loaded = store.get_quote(quote.id).await.unwrap().unwrap();
    assert_eq!(loaded.text, quote.text);
    assert_eq!(loaded.context.as_deref(), Some("Letters"));
    assert_eq!(loaded.cluster, None);
    assert!(loaded.projection.is_none());

    let mut assignments = HashMap::new();
    assignments.insert(quote.id, 3u32);
    store.apply_cluster_assignments(&assignments).await.unwrap();

    let mut coords = HashMap::new();
    coords.insert(quote.id, (0.25f32, 0.75f32));
    store.apply_projections(&coords).await.unwrap();

    let joined = store.get_quote(quote.id).await.unwrap().unwrap();
    assert_eq!(joined.cluster, Some(3));
    let projection = joined.projection.unwrap();
    assert!((projection.x - 0.25).abs() < f32::EPSILON);
    assert!((projection.y - 0.75).abs() < f32::EPSILON);
}

#[tokio::test]
async fn list_quotes_filters_and_orders_newest_first() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let seneca = store.upsert_author("Seneca", None, None).await.unwrap();
    let twain = store.upsert_author("Mark Twain", None, None).await.unwrap();

    let mut ids = Vec::new();
    for (i, author) in [seneca.id, twain.id, seneca.id].iter().enumerate() {
        let mut quote = Quote::new(format!("quote {i}"), *author);
        // Spread timestamps so ordering is unambiguous.
        quote.created_at += chrono::Duration::seconds(i as i64);
        store.put_quote(&quote).await.unwrap();
        ids.push(quote.id);
    }

    let all = store.list_quotes(QuoteFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].id, ids[2]);
    assert_eq!(all[2].id, ids[0]);

    let by_author = store
        .list_quotes(QuoteFilter::default().with_author(seneca.id))
        .await
        .unwrap();
    assert_eq!(by_author.len(), 2);
    assert!(by_author.iter().all(|q| q.author_id == seneca.id));

    let limited = store
        .list_quotes(QuoteFilter::default().with_limit(1))
        .await
        .unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, ids[2]);

    assert_eq!(store.count_quotes().await.unwrap(), 3);
}

#[tokio::test]
async fn embedding_dimension_is_fixed_by_first_write() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let author = store.upsert_author("Seneca", None, None).await.unwrap();
    let a = Quote::new("a", author.id);
    let b = Quote::new("b", author.id);
    store.put_quote(&a).await.unwrap();
    store.put_quote(&b).await.unwrap();

    store.put_embedding(a.id, &[1.0, 0.0, 0.0]).await.unwrap();
    let err = store.put_embedding(b.id, &[1.0, 0.0]).await.unwrap_err();
    assert!(matches!(
        err,
        CoreError::DimensionMismatch { expected: 3, actual: 2 }
    ));

    let vector = store.get_embedding(a.id).await.unwrap().unwrap();
    assert_eq!(vector, vec![1.0, 0.0, 0.0]);
    assert!(store.get_embedding(b.id).await.unwrap().is_none());

    let all = store.all_embeddings().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].0, a.id);
}

#[tokio::test]
async fn edge_replacement_fully_overwrites() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let author = store.upsert_author("Seneca", None, None).await.unwrap();
    let quotes: Vec<Quote> = (0..3).map(|i| Quote::new(format!("q{i}"), author.id)).collect();
    for q in &quotes {
        store.put_quote(q).await.unwrap();
    }

    let first = vec![
        SimilarityEdge::new(quotes[0].id, quotes[1].id, 0.9),
        SimilarityEdge::new(quotes[1].id, quotes[2].id, 0.8),
    ];
    store.replace_similarity_edges(&first).await.unwrap();
    assert_eq!(store.similarity_edges().await.unwrap().len(), 2);

    let second = vec![SimilarityEdge::new(quotes[2].id, quotes[0].id, 0.7)];
    store.replace_similarity_edges(&second).await.unwrap();

    let edges = store.similarity_edges().await.unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].source, quotes[2].id);
    assert_eq!(edges[0].target, quotes[0].id);
    assert!((edges[0].score - 0.7).abs() < 1e-6);

    store.replace_similarity_edges(&[]).await.unwrap();
    assert!(store.similarity_edges().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_quote_removes_all_traces() {
    let dir = TempDir::new().unwrap();
    let store = open_store(&dir);

    let author = store.upsert_author("Seneca", None, None).await.unwrap();
    let keep = Quote::new("keep", author.id);
    let drop = Quote::new("drop", author.id);
    store.put_quote(&keep).await.unwrap();
    store.put_quote(&drop).await.unwrap();
    store.put_embedding(drop.id, &[0.5, 0.5]).await.unwrap();

    let edges = vec![
        SimilarityEdge::new(keep.id, drop.id, 0.6),
        SimilarityEdge::new(drop.id, keep.id, 0.6),
    ];
    store.replace_similarity_edges(&edges).await.unwrap();

    let mut assignments = HashMap::new();
    assignments.insert(drop.id, 0u32);
    store.apply_cluster_assignments(&assignments).await.unwrap();

    assert!(store.delete_quote(drop.id).await.unwrap());
    assert!(!store.delete_quote(drop.id).await.unwrap());

    assert!(store.get_quote(drop.id).await.unwrap().is_none());
    assert!(store.get_embedding(drop.id).await.unwrap().is_none());
    assert!(store.similarity_edges().await.unwrap().is_empty());
    assert!(store.cluster_assignments().await.unwrap().is_empty());
    assert!(store.get_quote(keep.id).await.unwrap().is_some());
}

#[tokio::test]
async fn data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let quote_id;
    {
        let store = open_store(&dir);
        let author = store.upsert_author("Seneca", None, None).await.unwrap();
        let quote = Quote::new("persisted", author.id);
        store.put_quote(&quote).await.unwrap();
        store.put_embedding(quote.id, &[0.1, 0.2]).await.unwrap();
        quote_id = quote.id;
    }

    let store = open_store(&dir);
    assert!(store.health_check().is_ok());
    let quote = store.get_quote(quote_id).await.unwrap().unwrap();
    assert_eq!(quote.text, "persisted");
    assert_eq!(store.get_embedding(quote_id).await.unwrap().unwrap(), vec![0.1, 0.2]);
}
