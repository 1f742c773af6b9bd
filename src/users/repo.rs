use crate::{error::Error, users::models::User};
use sqlx::PgPool;

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

pub struct UserRepo;

impl UserRepo {
    /// Looks up the mirror row by email.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Looks up the mirror row by username.
    ///
    /// # Errors
    /// Returns an error if the database query fails.
    pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(pool)
            .await?;

        Ok(user)
    }

    /// Inserts a new mirror row with `confirmed_at` absent.
    ///
    /// # Errors
    /// Returns `Error::Constraint` when a unique index rejects the row
    /// (username or email race), any other database failure as
    /// `Error::Store`.
    pub async fn create(pool: &PgPool, username: &str, email: &str) -> Result<User, Error> {
        sqlx::query_as::<_, User>(
            r"
            INSERT INTO users (username, email, confirmed_at)
            VALUES ($1, $2, NULL)
            RETURNING *
            ",
        )
        .bind(username)
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                Error::Constraint("User with this username or email already exists".to_string())
            } else {
                Error::Store(e)
            }
        })
    }

    /// Stamps `confirmed_at` on the matching row.
    ///
    /// # Errors
    /// Returns `Error::NotFound` when no row matches the username.
    pub async fn mark_confirmed(pool: &PgPool, username: &str) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(
            r"
            UPDATE users SET confirmed_at = NOW()
            WHERE username = $1
            RETURNING *
            ",
        )
        .bind(username)
        .fetch_optional(pool)
        .await?;

        user.ok_or_else(|| Error::NotFound("User not found".to_string()))
    }

    /// Removes the mirror row. The remote provider account is untouched.
    ///
    /// # Errors
    /// Returns `Error::NotFound` when no row matches the username.
    pub async fn delete(pool: &PgPool, username: &str) -> Result<(), Error> {
        let result = sqlx::query("DELETE FROM users WHERE username = $1")
            .bind(username)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
