//! The approval queue as an operator sees it.
//!
//! A [`MemberQueue`] holds the pending members last fetched for one member
//! type. Approving or rejecting through the queue drops the member from the
//! held listing as soon as the store accepts the change; a failed call leaves
//! the listing exactly as it was. [`MemberStats`] are always folded from
//! whatever the queue currently holds.

use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;

use super::{manager, Member, MemberId, MemberStatus, MemberType};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemberStats {
    pub total: usize,
    pub active: usize,
    pub pending: usize,
    pub inactive: usize,
}

impl MemberStats {
    pub fn tally(members: &[Member]) -> MemberStats {
        members
            .iter()
            .fold(MemberStats::default(), |mut stats, member| {
                stats.total += 1;
                match member.status {
                    MemberStatus::Approved => stats.active += 1,
                    MemberStatus::Pending => stats.pending += 1,
                    MemberStatus::Rejected => stats.inactive += 1,
                }
                stats
            })
    }
}

#[derive(Clone, Debug)]
pub struct MemberQueue {
    member_type: MemberType,
    members: Vec<Member>,
}

impl MemberQueue {
    pub fn new(member_type: MemberType) -> MemberQueue {
        MemberQueue {
            member_type,
            members: vec![],
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn stats(&self) -> MemberStats {
        MemberStats::tally(&self.members)
    }

    /// Replaces the held listing with the store's current pending members.
    pub async fn refresh(&mut self, db: &dyn Database) -> Result<&[Member], Error> {
        self.members = manager::get_pending_members(db, self.member_type).await?;

        Ok(&self.members)
    }

    pub async fn approve(&mut self, db: &dyn Database, member_id: MemberId) -> Result<Member, Error> {
        let member = manager::approve_member(db, self.member_type, member_id).await?;
        self.remove(member_id);

        Ok(member)
    }

    pub async fn reject(
        &mut self,
        db: &dyn Database,
        member_id: MemberId,
        reason: Option<String>,
    ) -> Result<Member, Error> {
        let member = manager::reject_member(db, self.member_type, member_id, reason).await?;
        self.remove(member_id);

        Ok(member)
    }

    fn remove(&mut self, member_id: MemberId) {
        self.members.retain(|member| member.id != member_id);
    }
}
