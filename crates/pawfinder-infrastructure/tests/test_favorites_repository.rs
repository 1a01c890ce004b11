use pawfinder_core::favorites::{Favorites, FavoritesRepository};
use pawfinder_infrastructure::{JsonFavoritesRepository, PawfinderPaths};
use tempfile::TempDir;

#[tokio::test]
async fn test_favorites_survive_a_new_repository_instance() {
    let temp_dir = TempDir::new().unwrap();
    let path = PawfinderPaths::new(Some(temp_dir.path()))
        .favorites_file()
        .unwrap();

    let mut favorites = Favorites::new();
    favorites.toggle("12");
    favorites.toggle("47");

    let first = JsonFavoritesRepository::with_path(path.clone());
    first.save(favorites.ids()).await.expect("Should save favorites");

    // A second instance stands in for the next program start.
    let second = JsonFavoritesRepository::with_path(path);
    let loaded = second
        .load()
        .await
        .expect("Should load favorites")
        .expect("Favorites should exist");

    assert_eq!(loaded, vec!["12".to_string(), "47".to_string()]);
}

#[tokio::test]
async fn test_remove_then_load_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("favorites.json");
    let repo = JsonFavoritesRepository::with_path(path.clone());

    repo.save(&["1".to_string()]).await.unwrap();
    repo.remove().await.unwrap();

    assert!(!path.exists(), "Storage entry should be gone");
    assert!(repo.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_each_save_replaces_the_whole_list() {
    let temp_dir = TempDir::new().unwrap();
    let repo = JsonFavoritesRepository::with_path(temp_dir.path().join("favorites.json"));

    repo.save(&["1".to_string(), "2".to_string()]).await.unwrap();
    repo.save(&["2".to_string()]).await.unwrap();

    assert_eq!(repo.load().await.unwrap(), Some(vec!["2".to_string()]));
}
