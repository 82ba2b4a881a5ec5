use crate::{ErrorKind, ImageFilter, ImagePatch, ImageStore, NewImage, PixlyError};

fn sample(name: &str, camera: &str, location: &str) -> NewImage {
    NewImage::new(
        name,
        camera,
        location,
        format!("http://{}.test", name.replace(' ', "-")),
    )
}

/// Seed the two fixture images used by most of the tests below.
async fn seed(store: &dyn ImageStore) -> (i32, i32) {
    let first = store
        .add(sample("modelTest1", "Sony", "San Francisco"))
        .await
        .unwrap();
    let second = store
        .add(sample("modelTest2", "Leica", "Los Angeles"))
        .await
        .unwrap();
    (first.id, second.id)
}

// ---- Store Certification Tests ----

pub async fn test_add_should_store_and_return_image(store: &dyn ImageStore) {
    let new_image = sample("New Image", "Canon", "Las Vegas").with_style("sepia");
    let image = store.add(new_image.clone()).await.unwrap();

    assert_eq!(image.name, "New Image");
    assert_eq!(image.camera, "Canon");
    assert_eq!(image.style, "sepia");
    assert_eq!(image.image_location, "Las Vegas");
    assert_eq!(image.image_url, new_image.image_url);

    let stored = store.get(image.id).await.unwrap();
    assert_eq!(stored, image);
}

pub async fn test_add_should_default_style(store: &dyn ImageStore) {
    let image = store
        .add(sample("unstyled", "Canon", "Las Vegas"))
        .await
        .unwrap();
    assert_eq!(image.style, crate::DEFAULT_STYLE);
    assert_eq!(store.get(image.id).await.unwrap().style, "normal");
}

pub async fn test_add_should_reject_duplicate_name(store: &dyn ImageStore) {
    store.add(sample("dupe", "Canon", "Reno")).await.unwrap();
    let err = store
        .add(sample("dupe", "Nikon", "Elko"))
        .await
        .unwrap_err();
    assert!(matches!(err, PixlyError::BadRequest(_)), "got {err:?}");
    assert_eq!(err.to_string(), "Duplicate image: dupe");

    let all = store.find_all(&ImageFilter::default()).await.unwrap();
    assert_eq!(all.iter().filter(|i| i.name == "dupe").count(), 1);
}

/// The pre-check is skipped here, so only the storage constraint can refuse
/// the second row.
pub async fn test_insert_should_enforce_unique_name(store: &dyn ImageStore) {
    store.add(sample("raced", "Canon", "Reno")).await.unwrap();
    let err = store
        .insert(sample("raced", "Nikon", "Elko"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest, "got {err:?}");

    let all = store
        .find_all(&ImageFilter::default().name("raced"))
        .await
        .unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].camera, "Canon");
}

pub async fn test_find_all_should_order_by_name(store: &dyn ImageStore) {
    store.add(sample("charlie", "Sony", "Oslo")).await.unwrap();
    store.add(sample("alpha", "Sony", "Oslo")).await.unwrap();
    store.add(sample("bravo", "Sony", "Oslo")).await.unwrap();

    let names: Vec<String> = store
        .find_all(&ImageFilter::default())
        .await
        .unwrap()
        .into_iter()
        .map(|i| i.name)
        .collect();
    assert_eq!(names, vec!["alpha", "bravo", "charlie"]);
}

pub async fn test_find_all_should_filter_by_partial_match(store: &dyn ImageStore) {
    let (first, second) = seed(store).await;

    let by_style = store
        .find_all(&ImageFilter::default().style("NORMAL"))
        .await
        .unwrap();
    assert_eq!(
        by_style.iter().map(|i| i.id).collect::<Vec<_>>(),
        vec![first, second]
    );

    let by_name = store
        .find_all(&ImageFilter::default().name("2"))
        .await
        .unwrap();
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].id, second);

    let combined = store
        .find_all(
            &ImageFilter::default()
                .image_location("francisco")
                .camera("so"),
        )
        .await
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].id, first);

    let empty_value = store
        .find_all(&ImageFilter::default().camera(""))
        .await
        .unwrap();
    assert_eq!(empty_value.len(), 2);
}

pub async fn test_find_all_should_return_empty_when_nothing_matches(store: &dyn ImageStore) {
    seed(store).await;
    let found = store
        .find_all(&ImageFilter::default().name("nope"))
        .await
        .unwrap();
    assert!(found.is_empty());
}

pub async fn test_get_should_return_all_fields(store: &dyn ImageStore) {
    let (first, _) = seed(store).await;
    let image = store.get(first).await.unwrap();
    assert_eq!(image.id, first);
    assert_eq!(image.name, "modelTest1");
    assert_eq!(image.camera, "Sony");
    assert_eq!(image.style, "normal");
    assert_eq!(image.image_location, "San Francisco");
    assert_eq!(image.image_url, "http://modelTest1.test");
}

pub async fn test_get_should_fail_for_missing_id(store: &dyn ImageStore) {
    let err = store.get(0).await.unwrap_err();
    assert!(matches!(err, PixlyError::NotFound(_)), "got {err:?}");
}

pub async fn test_update_should_change_only_named_fields(store: &dyn ImageStore) {
    let (first, second) = seed(store).await;
    let before = store.get(first).await.unwrap();

    let patch = ImagePatch {
        style: Some("black and white".into()),
        ..Default::default()
    };
    let updated = store.update(first, &patch).await.unwrap();
    assert_eq!(updated.style, "black and white");
    assert_eq!(updated.name, before.name);
    assert_eq!(updated.camera, before.camera);
    assert_eq!(updated.image_location, before.image_location);
    assert_eq!(updated.image_url, before.image_url);
    assert_eq!(store.get(first).await.unwrap(), updated);

    let patch = ImagePatch {
        name: Some("New Name".into()),
        image_location: Some("Tahoe".into()),
        ..Default::default()
    };
    let renamed = store.update(first, &patch).await.unwrap();
    assert_eq!(renamed.name, "New Name");
    assert_eq!(renamed.image_location, "Tahoe");
    assert_eq!(renamed.style, "black and white");

    // Neighbouring rows are untouched.
    assert_eq!(store.get(second).await.unwrap().name, "modelTest2");
}

pub async fn test_update_should_reject_empty_patch(store: &dyn ImageStore) {
    let (first, _) = seed(store).await;
    let err = store
        .update(first, &ImagePatch::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PixlyError::BadRequest(_)), "got {err:?}");

    let err = store.update(0, &ImagePatch::default()).await.unwrap_err();
    assert!(matches!(err, PixlyError::BadRequest(_)), "got {err:?}");
}

pub async fn test_update_should_fail_for_missing_id(store: &dyn ImageStore) {
    let patch = ImagePatch {
        name: Some("new 0".into()),
        ..Default::default()
    };
    let err = store.update(0, &patch).await.unwrap_err();
    assert!(matches!(err, PixlyError::NotFound(_)), "got {err:?}");
}

/// A missing row wins over a name clash, as in SQL where the `WHERE id`
/// matches nothing and the UNIQUE constraint never fires.
pub async fn test_update_should_report_missing_id_before_name_clash(store: &dyn ImageStore) {
    store.add(sample("taken", "Canon", "Reno")).await.unwrap();
    let patch = ImagePatch {
        name: Some("taken".into()),
        ..Default::default()
    };
    let err = store.update(999, &patch).await.unwrap_err();
    assert!(matches!(err, PixlyError::NotFound(_)), "got {err:?}");
}

pub async fn test_update_should_reject_rename_to_taken_name(store: &dyn ImageStore) {
    let (first, _) = seed(store).await;
    let patch = ImagePatch {
        name: Some("modelTest2".into()),
        ..Default::default()
    };
    let err = store.update(first, &patch).await.unwrap_err();
    assert!(matches!(err, PixlyError::BadRequest(_)), "got {err:?}");
    assert_eq!(err.to_string(), "Duplicate image: modelTest2");
    assert_eq!(store.get(first).await.unwrap().name, "modelTest1");
}

pub async fn test_remove_should_delete_image(store: &dyn ImageStore) {
    let (first, second) = seed(store).await;
    store.remove(first).await.unwrap();

    let remaining = store.find_all(&ImageFilter::default()).await.unwrap();
    assert_eq!(remaining.iter().map(|i| i.id).collect::<Vec<_>>(), vec![second]);
    assert!(matches!(
        store.get(first).await.unwrap_err(),
        PixlyError::NotFound(_)
    ));
}

pub async fn test_remove_should_fail_for_missing_id(store: &dyn ImageStore) {
    let err = store.remove(0).await.unwrap_err();
    assert!(matches!(err, PixlyError::NotFound(_)), "got {err:?}");
}
