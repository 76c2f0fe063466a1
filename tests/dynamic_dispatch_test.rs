use rust_decimal_macros::dec;
use storefront::domain::payment::{Amount, PaymentMethod};
use storefront::domain::ports::{PaymentStoreBox, UserStoreBox};
use storefront::domain::user::{PasswordDigest, Username};
use storefront::infrastructure::in_memory::{InMemoryPaymentStore, InMemoryUserStore};
use storefront::infrastructure::sqlite::SqliteStore;

async fn exercise(users: UserStoreBox, payments: PaymentStoreBox) {
    // Verify Send + Sync by spawning tasks
    let users_handle = tokio::spawn(async move {
        let alice = Username::new("alice").unwrap();
        users
            .create(&alice, &PasswordDigest::of("pw1"))
            .await
            .unwrap();
        users.find(&alice).await.unwrap().unwrap()
    });

    let payments_handle = tokio::spawn(async move {
        let alice = Username::new("alice").unwrap();
        payments
            .append(&alice, Amount::new(dec!(1.25)).unwrap(), PaymentMethod::Card)
            .await
            .unwrap();
        payments.for_user(&alice).await.unwrap()
    });

    let user = users_handle.await.unwrap();
    assert_eq!(user.username.as_str(), "alice");
    assert!(user.password_digest.matches("pw1"));

    let history = payments_handle.await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].amount.value(), dec!(1.25));
}

#[tokio::test]
async fn test_in_memory_stores_as_trait_objects() {
    exercise(
        Box::new(InMemoryUserStore::new()),
        Box::new(InMemoryPaymentStore::new()),
    )
    .await;
}

#[tokio::test]
async fn test_sqlite_store_as_trait_objects() {
    let store = SqliteStore::open_in_memory().unwrap();
    exercise(Box::new(store.clone()), Box::new(store)).await;
}
