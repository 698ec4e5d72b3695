use async_trait::async_trait;
use mongodb::Collection;

use crate::campaign::db::CampaignStore;
use crate::campaign::{self, Campaign};
use crate::error::Error;
use crate::member::db::MemberStore;
use crate::member::{self, Member, MemberType};

pub type MongoCampaignStore = Collection<Campaign>;
pub type MongoMemberStore = Collection<Member>;

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;

    /// The store holding members of `member_type`, each type is kept apart.
    fn members(&self, member_type: MemberType) -> &dyn MemberStore;

    async fn drop(&self) -> Result<(), Error>;
}

#[derive(Debug, Clone)]
pub struct MongoDatabase {
    campaigns: MongoCampaignStore,
    agencies: MongoMemberStore,
    advertisers: MongoMemberStore,
    partners: MongoMemberStore,
    db: mongodb::Database,
}

impl MongoDatabase {
    pub async fn initialize(db: mongodb::Database) -> Result<MongoDatabase, Error> {
        campaign::db::initialize(&db).await?;
        member::db::initialize(&db).await?;

        Ok(MongoDatabase {
            campaigns: db.collection(campaign::db::CAMPAIGNS),
            agencies: db.collection(MemberType::Agency.collection_name()),
            advertisers: db.collection(MemberType::Advertiser.collection_name()),
            partners: db.collection(MemberType::Partner.collection_name()),
            db,
        })
    }
}

#[async_trait]
impl Database for MongoDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    fn members(&self, member_type: MemberType) -> &dyn MemberStore {
        match member_type {
            MemberType::Agency => &self.agencies,
            MemberType::Advertiser => &self.advertisers,
            MemberType::Partner => &self.partners,
        }
    }

    async fn drop(&self) -> Result<(), Error> {
        self.db.drop(None).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod test {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::campaign::db::CampaignStore;
    use crate::campaign::{Campaign, CampaignId};
    use crate::error::Error;
    use crate::member::db::MemberStore;
    use crate::member::{Member, MemberId, MemberStatus, MemberType, Review};

    use super::Database;

    type Handler<A, R> = Box<dyn Fn(A) -> Result<R, Error> + Send + Sync>;

    fn unexpected<A: 'static, R: 'static>(name: &'static str) -> Handler<A, R> {
        Box::new(move |_| panic!("unexpected call to {}", name))
    }

    pub struct MockCampaignStore {
        pub on_insert_campaign: Box<dyn Fn(&Campaign) -> Result<(), Error> + Send + Sync>,
        pub on_fetch_campaigns: Handler<(), Vec<Campaign>>,
        pub on_fetch_campaign_by_id: Handler<CampaignId, Option<Campaign>>,
        pub on_fetch_campaign_by_code:
            Box<dyn Fn(&str) -> Result<Option<Campaign>, Error> + Send + Sync>,
        pub on_count_campaigns_by_partner_and_day:
            Box<dyn Fn(&str, NaiveDate) -> Result<u64, Error> + Send + Sync>,
    }

    impl MockCampaignStore {
        pub fn new() -> MockCampaignStore {
            MockCampaignStore {
                on_insert_campaign: Box::new(|_| panic!("unexpected call to insert_campaign")),
                on_fetch_campaigns: unexpected("fetch_campaigns"),
                on_fetch_campaign_by_id: unexpected("fetch_campaign_by_id"),
                on_fetch_campaign_by_code: Box::new(|_| {
                    panic!("unexpected call to fetch_campaign_by_code")
                }),
                on_count_campaigns_by_partner_and_day: Box::new(|_, _| {
                    panic!("unexpected call to count_campaigns_by_partner_and_day")
                }),
            }
        }
    }

    #[async_trait]
    impl CampaignStore for MockCampaignStore {
        async fn insert_campaign(&self, campaign: &Campaign) -> Result<(), Error> {
            (self.on_insert_campaign)(campaign)
        }

        async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns)(())
        }

        async fn fetch_campaign_by_id(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_id)(campaign_id)
        }

        async fn fetch_campaign_by_code(
            &self,
            campaign_code: &str,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_code)(campaign_code)
        }

        async fn count_campaigns_by_partner_and_day(
            &self,
            partner_code: &str,
            day: NaiveDate,
        ) -> Result<u64, Error> {
            (self.on_count_campaigns_by_partner_and_day)(partner_code, day)
        }
    }

    pub struct MockMemberStore {
        pub on_insert_member: Box<dyn Fn(&Member) -> Result<(), Error> + Send + Sync>,
        pub on_fetch_members: Handler<(), Vec<Member>>,
        pub on_fetch_members_by_status: Handler<MemberStatus, Vec<Member>>,
        pub on_fetch_member_by_id: Handler<MemberId, Option<Member>>,
        pub on_update_member_status: Box<
            dyn Fn(Member, MemberStatus, Option<String>) -> Result<Member, Error> + Send + Sync,
        >,
    }

    impl MockMemberStore {
        pub fn new() -> MockMemberStore {
            MockMemberStore {
                on_insert_member: Box::new(|_| panic!("unexpected call to insert_member")),
                on_fetch_members: unexpected("fetch_members"),
                on_fetch_members_by_status: unexpected("fetch_members_by_status"),
                on_fetch_member_by_id: unexpected("fetch_member_by_id"),
                on_update_member_status: Box::new(|_, _, _| {
                    panic!("unexpected call to update_member_status")
                }),
            }
        }
    }

    impl MockMemberStore {
        /// A store answering every call from `members`, as a real collection would.
        pub fn backed_by(members: Arc<Mutex<Vec<Member>>>) -> MockMemberStore {
            let mut store = MockMemberStore::new();

            let all = Arc::clone(&members);
            store.on_insert_member = Box::new(move |member| {
                all.lock().unwrap().push(member.clone());
                Ok(())
            });
            let all = Arc::clone(&members);
            store.on_fetch_members = Box::new(move |_| Ok(all.lock().unwrap().clone()));
            let all = Arc::clone(&members);
            store.on_fetch_members_by_status = Box::new(move |status| {
                Ok(all
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|member| member.status == status)
                    .cloned()
                    .collect())
            });
            let all = Arc::clone(&members);
            store.on_fetch_member_by_id = Box::new(move |member_id| {
                Ok(all
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|member| member.id == member_id)
                    .cloned())
            });
            let all = members;
            store.on_update_member_status = Box::new(move |mut member, status, reason| {
                let mut all = all.lock().unwrap();
                let stored = all
                    .iter_mut()
                    .find(|stored| stored.id == member.id && stored.status == MemberStatus::Pending)
                    .ok_or(Error::ConcurrentModificationDetected)?;
                let now = Utc::now();
                member.status = status;
                member.modified_at = now;
                member.review = Some(Review {
                    reviewed_at: now,
                    reason,
                });
                *stored = member.clone();
                Ok(member)
            });

            store
        }
    }

    #[async_trait]
    impl MemberStore for MockMemberStore {
        async fn insert_member(&self, member: &Member) -> Result<(), Error> {
            (self.on_insert_member)(member)
        }

        async fn fetch_members(&self) -> Result<Vec<Member>, Error> {
            (self.on_fetch_members)(())
        }

        async fn fetch_members_by_status(
            &self,
            status: MemberStatus,
        ) -> Result<Vec<Member>, Error> {
            (self.on_fetch_members_by_status)(status)
        }

        async fn fetch_member_by_id(&self, member_id: MemberId) -> Result<Option<Member>, Error> {
            (self.on_fetch_member_by_id)(member_id)
        }

        async fn update_member_status(
            &self,
            member: Member,
            status: MemberStatus,
            reason: Option<String>,
        ) -> Result<Member, Error> {
            (self.on_update_member_status)(member, status, reason)
        }
    }

    pub struct MockDatabase {
        pub campaigns: MockCampaignStore,
        pub agencies: MockMemberStore,
        pub advertisers: MockMemberStore,
        pub partners: MockMemberStore,
    }

    impl MockDatabase {
        pub fn new() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::new(),
                agencies: MockMemberStore::new(),
                advertisers: MockMemberStore::new(),
                partners: MockMemberStore::new(),
            }
        }

        pub fn members_mut(&mut self, member_type: MemberType) -> &mut MockMemberStore {
            match member_type {
                MemberType::Agency => &mut self.agencies,
                MemberType::Advertiser => &mut self.advertisers,
                MemberType::Partner => &mut self.partners,
            }
        }
    }

    #[async_trait]
    impl Database for MockDatabase {
        fn campaigns(&self) -> &dyn CampaignStore {
            &self.campaigns
        }

        fn members(&self, member_type: MemberType) -> &dyn MemberStore {
            match member_type {
                MemberType::Agency => &self.agencies,
                MemberType::Advertiser => &self.advertisers,
                MemberType::Partner => &self.partners,
            }
        }

        async fn drop(&self) -> Result<(), Error> {
            Ok(())
        }
    }
}
