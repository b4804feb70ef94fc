//! Merchant accounts: password hashing, login checks and account creation

use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
};
use tracing::{info, warn};

use crate::entities::{merchants, prelude::*, restaurants};
use crate::error::AppError;
use crate::session::MerchantIdentity;

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Malformed stored hashes verify as false
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Why a login attempt was refused. Only logged; callers show one generic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    UnknownUser,
    WrongPassword,
    NoRestaurant,
}

/// Check credentials and that the merchant owns a restaurant
pub async fn authenticate<C>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<Result<MerchantIdentity, LoginFailure>, sea_orm::DbErr>
where
    C: ConnectionTrait,
{
    let Some(merchant) = Merchants::find()
        .filter(merchants::Column::Username.eq(username))
        .one(db)
        .await?
    else {
        return Ok(Err(LoginFailure::UnknownUser));
    };

    if !verify_password(password, &merchant.password_hash) {
        return Ok(Err(LoginFailure::WrongPassword));
    }

    let Some(restaurant) = Restaurants::find()
        .filter(restaurants::Column::OwnerId.eq(merchant.id))
        .one(db)
        .await?
    else {
        warn!(merchant_id = merchant.id, "Merchant has no restaurant");
        return Ok(Err(LoginFailure::NoRestaurant));
    };

    Ok(Ok(MerchantIdentity {
        merchant_id: merchant.id,
        username: merchant.username,
        restaurant_id: restaurant.id,
    }))
}

/// Create a login account without a restaurant
pub async fn create_merchant_account<C>(
    db: &C,
    username: &str,
    password: &str,
) -> Result<merchants::Model, AppError>
where
    C: ConnectionTrait,
{
    let merchant = merchants::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(hash_password(password)?),
        created_at: Set(Utc::now()),
        ..Default::default()
    };

    Ok(merchant.insert(db).await?)
}

/// Create a merchant account together with the restaurant it owns
pub async fn create_merchant<C>(
    db: &C,
    username: &str,
    password: &str,
    restaurant_name: &str,
    description: &str,
) -> Result<(merchants::Model, restaurants::Model), AppError>
where
    C: TransactionTrait,
{
    let txn = db.begin().await?;

    let merchant = create_merchant_account(&txn, username, password).await?;

    let restaurant = restaurants::ActiveModel {
        owner_id: Set(merchant.id),
        name: Set(restaurant_name.to_string()),
        description: Set(description.to_string()),
        num_tables: Set(0),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    info!(
        merchant_id = merchant.id,
        restaurant_id = restaurant.id,
        username,
        "Created merchant"
    );

    Ok((merchant, restaurant))
}
