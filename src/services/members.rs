//! Member registry service

use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        generate_id,
        lending::LendingDetails,
        member::{CreateMember, Member, MemberPage, MemberQuery, UpdateMember, MEMBER_PAGE_LIMIT},
        now,
    },
    repository::Repository,
    services::{aggregate_cache::AggregateCache, codec::IdCodec},
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
    cache: Arc<AggregateCache>,
    codec: Arc<dyn IdCodec>,
}

impl MembersService {
    pub fn new(repository: Repository, cache: Arc<AggregateCache>, codec: Arc<dyn IdCodec>) -> Self {
        Self {
            repository,
            cache,
            codec,
        }
    }

    /// Register a new member
    pub async fn register(&self, request: CreateMember) -> AppResult<Member> {
        request.validate()?;

        let member = Member {
            id: generate_id(),
            name: request.name,
            address: request.address,
            phone_number: request.phone_number,
            banned: false,
            created_at: now(),
        };
        self.repository.members.create(&member).await?;
        self.cache.on_member_registered();

        tracing::info!(member_id = %member.id, "Member registered");
        Ok(member)
    }

    /// One page of non-banned members; the total comes from the cache
    pub async fn list(&self, query: &MemberQuery) -> AppResult<MemberPage> {
        let order = query.order()?;
        let members = self
            .repository
            .members
            .list(order, query.cursor(), MEMBER_PAGE_LIMIT)
            .await?;

        if members.is_empty() {
            return Err(AppError::NotFound("no members to show in this page".to_string()));
        }

        Ok(MemberPage {
            members,
            total: self.cache.member_count(),
        })
    }

    /// Get a non-banned member; `encrypted` ids go through the codec first
    pub async fn get(&self, id: &str, encrypted: bool) -> AppResult<Member> {
        let id = if encrypted {
            self.codec.decode(id)?
        } else {
            id.to_string()
        };
        self.repository.members.get_active(&id).await
    }

    /// Edit the non-empty fields of a non-banned member
    pub async fn update(&self, id: &str, update: UpdateMember) -> AppResult<()> {
        let update = update.normalized()?;
        self.repository.members.update(id, &update).await?;
        tracing::info!(member_id = %id, "Member updated");
        Ok(())
    }

    /// Ban a member, releasing every book they hold
    pub async fn ban(&self, id: &str) -> AppResult<()> {
        let released = self.repository.members.ban(id).await?;
        self.cache.on_member_banned();
        tracing::info!(member_id = %id, released, "Member banned");
        Ok(())
    }

    /// Live lendings of a non-banned member
    pub async fn lendings(&self, id: &str) -> AppResult<Vec<LendingDetails>> {
        self.repository.members.get_active(id).await?;
        self.repository.lendings.list(None, Some(id)).await
    }
}
