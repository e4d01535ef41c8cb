//! Sample inventory seeding.
//!
//! Converts the deterministic `sample-data` tree into validated drafts and
//! writes it through the inventory and user ports. Generating always starts
//! from an empty inventory; resetting additionally recreates the sample user.

use std::sync::Arc;

use sample_data::{
    DispenserKindSeed, GenerationError, InventoryShape, SampleDispenserSeed, SampleInventory,
    SampleUserSeed, generate_sample_inventory,
};
use thiserror::Error;
use tracing::info;

use crate::domain::ports::{
    DispenserRepository, FloorRepository, InventoryRepositoryError, PantryRepository,
    UserPersistenceError, UserRepository,
};
use crate::domain::{
    DispenserDraft, DispenserFields, DispenserKind, DispenserValidationError, FloorDraft,
    FloorValidationError, PantryDraft, PantryId, PantryValidationError, PasswordDigest, User,
    UserId, UserValidationError, Username, normalise_email,
};

/// Counts produced by a seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDataOutcome {
    /// Owner of the generated floors.
    pub user_id: UserId,
    /// Floors removed before generation.
    pub removed_floors: u64,
    /// Floors inserted.
    pub floors: usize,
    /// Pantries inserted.
    pub pantries: usize,
    /// Dispensers inserted.
    pub dispensers: usize,
}

/// Errors raised while generating or persisting sample data.
#[derive(Debug, Error)]
pub enum SampleDataSeedingError {
    /// Tree generation failed.
    #[error("sample data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// Generated user failed validation.
    #[error("sample user is invalid: {0}")]
    User(#[from] UserValidationError),
    /// Generated floor failed validation.
    #[error("sample floor is invalid: {0}")]
    Floor(#[from] FloorValidationError),
    /// Generated pantry failed validation.
    #[error("sample pantry is invalid: {0}")]
    Pantry(#[from] PantryValidationError),
    /// Generated dispenser failed validation.
    #[error("sample dispenser is invalid: {0}")]
    Dispenser(#[from] DispenserValidationError),
    /// Inventory store failed.
    #[error("inventory persistence error: {0}")]
    Inventory(#[from] InventoryRepositoryError),
    /// User store failed.
    #[error("user persistence error: {0}")]
    Users(#[from] UserPersistenceError),
}

fn dispenser_kind(seed: DispenserKindSeed) -> DispenserKind {
    match seed {
        DispenserKindSeed::Drink => DispenserKind::Drink,
        DispenserKindSeed::Snack => DispenserKind::Snack,
        DispenserKindSeed::Coffee => DispenserKind::Coffee,
    }
}

fn dispenser_draft(
    seed: &SampleDispenserSeed,
    pantry: PantryId,
) -> Result<DispenserDraft, DispenserValidationError> {
    DispenserDraft::new(DispenserFields {
        kind: dispenser_kind(seed.kind),
        max_capacity: i64::from(seed.max_capacity),
        current_level: i64::from(seed.current_level),
        threshold: Some(i64::from(seed.threshold)),
        pantry,
    })
}

/// Service that seeds and resets the sample inventory.
pub struct SampleDataSeeder<U: ?Sized, F: ?Sized, P: ?Sized, D: ?Sized> {
    users: Arc<U>,
    floors: Arc<F>,
    pantries: Arc<P>,
    dispensers: Arc<D>,
    shape: InventoryShape,
}

impl<U, F, P, D> SampleDataSeeder<U, F, P, D>
where
    U: UserRepository + ?Sized,
    F: FloorRepository + ?Sized,
    P: PantryRepository + ?Sized,
    D: DispenserRepository + ?Sized,
{
    /// Create a seeder producing the default 5 x 3 x 3 tree.
    pub fn new(users: Arc<U>, floors: Arc<F>, pantries: Arc<P>, dispensers: Arc<D>) -> Self {
        Self {
            users,
            floors,
            pantries,
            dispensers,
            shape: InventoryShape::default(),
        }
    }

    /// Override the generated tree dimensions.
    #[must_use]
    pub fn with_shape(mut self, shape: InventoryShape) -> Self {
        self.shape = shape;
        self
    }

    /// Replace all inventory with a freshly generated tree.
    ///
    /// The sample user is created if missing and reused otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SampleDataSeedingError`] when generation, validation or
    /// persistence fails.
    pub async fn generate(&self, seed: u64) -> Result<SampleDataOutcome, SampleDataSeedingError> {
        let inventory = generate_sample_inventory(seed, self.shape)?;
        let user_id = self.ensure_user(&inventory.user).await?;
        let removed_floors = self.floors.delete_all().await?;
        let outcome = self.insert_tree(&inventory, user_id, removed_floors).await?;
        info!(
            seed,
            removed_floors,
            floors = outcome.floors,
            pantries = outcome.pantries,
            dispensers = outcome.dispensers,
            "sample data generated"
        );
        Ok(outcome)
    }

    /// Delete all inventory and the sample user, then generate again.
    ///
    /// # Errors
    ///
    /// Returns [`SampleDataSeedingError`] when any step fails.
    pub async fn reset(&self, seed: u64) -> Result<SampleDataOutcome, SampleDataSeedingError> {
        let removed = self.floors.delete_all().await?;
        let username = Username::new(SampleUserSeed::default().username)?;
        let user_removed = self.users.delete_by_username(&username).await?;
        info!(removed_floors = removed, user_removed, "sample data cleared");
        let outcome = self.generate(seed).await?;
        Ok(SampleDataOutcome {
            removed_floors: removed,
            ..outcome
        })
    }

    async fn ensure_user(&self, seed: &SampleUserSeed) -> Result<UserId, SampleDataSeedingError> {
        let username = Username::new(&seed.username)?;
        if let Some(stored) = self.users.find_by_username(&username).await? {
            return Ok(stored.user.id());
        }
        let email = normalise_email(Some(&seed.email))?;
        let user = User::new(UserId::random(), username, email);
        self.users
            .create(&user, &PasswordDigest::create(&seed.password))
            .await?;
        info!(user = %user.id(), username = %user.username(), "sample user created");
        Ok(user.id())
    }

    async fn insert_tree(
        &self,
        inventory: &SampleInventory,
        owner: UserId,
        removed_floors: u64,
    ) -> Result<SampleDataOutcome, SampleDataSeedingError> {
        let mut outcome = SampleDataOutcome {
            user_id: owner,
            removed_floors,
            floors: 0,
            pantries: 0,
            dispensers: 0,
        };
        for floor_seed in &inventory.floors {
            let floor = self
                .floors
                .insert(&FloorDraft::new(i64::from(floor_seed.number), owner)?)
                .await?;
            outcome.floors += 1;
            for pantry_seed in &floor_seed.pantries {
                let pantry = self
                    .pantries
                    .insert(&PantryDraft::new(&pantry_seed.name, floor.id())?)
                    .await?;
                outcome.pantries += 1;
                for dispenser_seed in &pantry_seed.dispensers {
                    self.dispensers
                        .insert(&dispenser_draft(dispenser_seed, pantry.id())?)
                        .await?;
                    outcome.dispensers += 1;
                }
            }
        }
        Ok(outcome)
    }
}
