//! Integration tests for the in-process store through the factory.

use std::collections::HashMap;

use skillmesh_vector_stores::{
    DistanceMetric, VectorRecord, VectorStore, VectorStoreConfig, VectorStoreFactory,
    VectorStoreProvider,
};

#[tokio::test]
async fn test_factory_creates_memory_store() {
    let config = VectorStoreConfig {
        provider: VectorStoreProvider::Memory,
        collection_name: "cards".to_string(),
        ..Default::default()
    };
    let store = VectorStoreFactory::create(config).await.unwrap();
    assert_eq!(store.collection_name(), "cards");

    store
        .create_collection("cards", 3, DistanceMetric::Cosine)
        .await
        .unwrap();
    store
        .upsert(vec![VectorRecord::new(
            "cv.opencv",
            vec![1.0, 0.0, 0.0],
            HashMap::from([("title".to_string(), serde_json::json!("OpenCV"))]),
        )])
        .await
        .unwrap();
    // Creating again keeps existing data.
    store
        .create_collection("cards", 3, DistanceMetric::Cosine)
        .await
        .unwrap();

    let hits = store.search(&[1.0, 0.0, 0.0], 5, None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "cv.opencv");
    assert_eq!(hits[0].payload["title"], "OpenCV");
}

#[tokio::test]
async fn test_memory_helper() {
    let store = VectorStoreFactory::memory("scratch");
    store
        .create_collection("scratch", 2, DistanceMetric::DotProduct)
        .await
        .unwrap();
    let info = store.collection_info("scratch").await.unwrap();
    assert_eq!(info.vector_count, 0);
    assert_eq!(info.distance, DistanceMetric::DotProduct);
}
