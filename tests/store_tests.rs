use camino::Utf8PathBuf;
use lumina::{NewPhoto, PhotoStore, PhotoUpdate, StoreConfig, StoreError};

fn memory_store() -> PhotoStore {
    PhotoStore::new(StoreConfig::in_memory())
}

#[tokio::test]
async fn test_create_assigns_unique_ids() {
    let store = memory_store();
    let mut ids = vec![];
    for i in 0..5u8 {
        ids.push(
            store
                .create(NewPhoto::new(vec![i; 16], format!("photo {i}")))
                .await
                .unwrap(),
        );
    }

    let photos = store.list_all().await.unwrap();
    assert_eq!(photos.len(), 5);
    for (i, photo) in photos.iter().enumerate() {
        assert_eq!(photo.id, ids[i]);
        assert_eq!(photo.blob, vec![i as u8; 16]);
        assert_eq!(photo.name, format!("photo {i}"));
    }
    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[tokio::test]
async fn test_list_is_ordered_by_timestamp() {
    let store = memory_store();
    for i in 0..4u8 {
        store.create(NewPhoto::new(vec![i], "x")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    }
    let first = store.list_all().await.unwrap()[1].id;
    store.delete(first).await.unwrap();
    store
        .update(store.list_all().await.unwrap()[0].id, PhotoUpdate::name("renamed"))
        .await
        .unwrap();
    store.create(NewPhoto::new(vec![9], "late")).await.unwrap();

    let photos = store.list_all().await.unwrap();
    assert_eq!(photos.len(), 4);
    assert!(photos.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(photos.last().unwrap().name, "late");
}

#[tokio::test]
async fn test_update_name_only() {
    let store = memory_store();
    let id = store
        .create(
            NewPhoto::new(vec![1, 2, 3], "before")
                .with_caption("A caption")
                .with_group("Work"),
        )
        .await
        .unwrap();
    let before = store.get(id).await.unwrap();

    store.update(id, PhotoUpdate::name("X")).await.unwrap();

    let after = store.get(id).await.unwrap();
    assert_eq!(after.name, "X");
    assert_eq!(after.id, before.id);
    assert_eq!(after.blob, before.blob);
    assert_eq!(after.timestamp, before.timestamp);
    assert_eq!(after.caption, before.caption);
    assert_eq!(after.group, before.group);
}

#[tokio::test]
async fn test_update_middle_group_only() {
    let store = memory_store();
    let a = store
        .create(NewPhoto::new(vec![1], "first").with_group("Trip"))
        .await
        .unwrap();
    let b = store.create(NewPhoto::new(vec![2], "second")).await.unwrap();
    let c = store.create(NewPhoto::new(vec![3], "third")).await.unwrap();
    let before = store.list_all().await.unwrap();

    store
        .update(b, PhotoUpdate::group(Some("Family".into())))
        .await
        .unwrap();

    let after = store.list_all().await.unwrap();
    assert_eq!(after.len(), 3);
    for (old, new) in before.iter().zip(&after) {
        assert_eq!(old.id, new.id);
        assert_eq!(old.blob, new.blob);
        assert_eq!(old.name, new.name);
        assert_eq!(old.timestamp, new.timestamp);
        assert_eq!(old.caption, new.caption);
    }
    let group_of = |id| after.iter().find(|p| p.id == id).unwrap().group.clone();
    assert_eq!(group_of(a), Some("Trip".to_owned()));
    assert_eq!(group_of(b), Some("Family".to_owned()));
    assert_eq!(group_of(c), None);
}

#[tokio::test]
async fn test_delete_is_permanent() {
    let store = memory_store();
    let id = store.create(NewPhoto::new(vec![5], "gone")).await.unwrap();

    store.delete(id).await.unwrap();

    assert!(store.list_all().await.unwrap().iter().all(|p| p.id != id));
    assert!(matches!(
        store.update(id, PhotoUpdate::name("again")).await,
        Err(StoreError::NotFound(missing)) if missing == id
    ));
    assert!(matches!(
        store.delete(id).await,
        Err(StoreError::NotFound(missing)) if missing == id
    ));
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let store = memory_store();
    let first = store.create(NewPhoto::new(vec![1], "a")).await.unwrap();
    let second = store.create(NewPhoto::new(vec![2], "b")).await.unwrap();
    store.delete(second).await.unwrap();

    let third = store.create(NewPhoto::new(vec![3], "c")).await.unwrap();
    assert!(third > second);
    assert!(second > first);
}

#[tokio::test]
async fn test_blank_name_gets_default() {
    let store = memory_store();
    let id = store.create(NewPhoto::new(vec![0xB1], "")).await.unwrap();

    let name = store.get(id).await.unwrap().name;
    let time = name.strip_prefix("Snap ").unwrap();
    let (hour, minute) = time.split_once(':').unwrap();
    assert!(hour.parse::<u8>().unwrap() < 24);
    assert!(minute.parse::<u8>().unwrap() < 60);
}

#[tokio::test]
async fn test_reopen_after_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("nested/lumina.db")).unwrap();
    let store = PhotoStore::new(StoreConfig::at_path(&path));

    let id = store
        .create(NewPhoto::new(vec![4, 2], "kept").with_caption("on disk"))
        .await
        .unwrap();
    store.close().await.unwrap();
    // Closing twice is harmless.
    store.close().await.unwrap();

    assert!(path.exists());
    let photo = store.get(id).await.unwrap();
    assert_eq!(photo.blob, vec![4, 2]);
    assert_eq!(photo.caption.as_deref(), Some("on disk"));

    // A second store on the same file sees the same records.
    let other = PhotoStore::new(StoreConfig::at_path(&path));
    assert_eq!(other.count().await.unwrap(), 1);
    other.close().await.unwrap();
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_unavailable_storage() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let path = Utf8PathBuf::from_path_buf(blocker.join("lumina.db")).unwrap();

    let store = PhotoStore::new(StoreConfig::at_path(&path));
    let err = store
        .create(NewPhoto::new(vec![1], "nowhere"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::StorageUnavailable(_)));
    assert!(matches!(
        store.list_all().await,
        Err(StoreError::StorageUnavailable(_))
    ));
}

fn file_store(dir: &tempfile::TempDir) -> PhotoStore {
    let path = Utf8PathBuf::from_path_buf(dir.path().join("lumina.db")).unwrap();
    PhotoStore::new(StoreConfig::at_path(&path))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_updates_keep_both_columns() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);

    for round in 0..10u8 {
        let id = store
            .create(NewPhoto::new(vec![round], "start").with_caption("start"))
            .await
            .unwrap();

        let name = format!("name {round}");
        let caption = format!("caption {round}");
        let (renamed, captioned) = tokio::join!(
            store.update(id, PhotoUpdate::name(name.as_str())),
            store.update(id, PhotoUpdate::caption(Some(caption.clone()))),
        );
        renamed.unwrap();
        captioned.unwrap();

        let photo = store.get(id).await.unwrap();
        assert_eq!(photo.name, name);
        assert_eq!(photo.caption, Some(caption));
        assert_eq!(photo.blob, vec![round]);
    }
    store.close().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_update_racing_delete_never_resurrects() {
    let dir = tempfile::tempdir().unwrap();
    let store = file_store(&dir);

    for round in 0..10u8 {
        let id = store
            .create(NewPhoto::new(vec![round], "doomed"))
            .await
            .unwrap();

        let (updated, deleted) = tokio::join!(
            store.update(id, PhotoUpdate::group(Some("Trip".into()))),
            store.delete(id),
        );
        deleted.unwrap();
        match updated {
            Ok(()) | Err(StoreError::NotFound(_)) => {}
            Err(e) => panic!("unexpected error {e:?}"),
        }

        assert!(matches!(store.get(id).await, Err(StoreError::NotFound(i)) if i == id));
        assert!(store.list_all().await.unwrap().iter().all(|p| p.id != id));
    }
    assert_eq!(store.count().await.unwrap(), 0);
    store.close().await.unwrap();
}
