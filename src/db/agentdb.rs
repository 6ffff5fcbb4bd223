use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    models::agentmodel::{Agent, AgentUpdate, NewAgent},
};

#[async_trait]
pub trait AgentExt {
    async fn create_agent(&self, agent: NewAgent) -> Result<Agent, sqlx::Error>;

    async fn get_agents(&self, limit: Option<i64>) -> Result<Vec<Agent>, sqlx::Error>;

    async fn update_agent(&self, agent_id: Uuid, changes: AgentUpdate) -> Result<Option<Agent>, sqlx::Error>;

    async fn delete_agent(&self, agent_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl AgentExt for DBClient {
    async fn create_agent(&self, agent: NewAgent) -> Result<Agent, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            INSERT INTO agents (full_name, specialization, experience_years, phone, email, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(agent.full_name)
        .bind(agent.specialization)
        .bind(agent.experience_years)
        .bind(agent.phone)
        .bind(agent.email)
        .bind(agent.photo_url)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_agents(&self, limit: Option<i64>) -> Result<Vec<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>("SELECT * FROM agents ORDER BY created_at DESC LIMIT $1")
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    async fn update_agent(&self, agent_id: Uuid, changes: AgentUpdate) -> Result<Option<Agent>, sqlx::Error> {
        sqlx::query_as::<_, Agent>(
            r#"
            UPDATE agents SET
                full_name = COALESCE($2, full_name),
                specialization = COALESCE($3, specialization),
                experience_years = COALESCE($4, experience_years),
                phone = COALESCE($5, phone),
                email = COALESCE($6, email),
                photo_url = COALESCE($7, photo_url),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(agent_id)
        .bind(changes.full_name)
        .bind(changes.specialization)
        .bind(changes.experience_years)
        .bind(changes.phone)
        .bind(changes.email)
        .bind(changes.photo_url)
        .fetch_optional(&self.pool)
        .await
    }

    async fn delete_agent(&self, agent_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM agents WHERE id = $1")
            .bind(agent_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
