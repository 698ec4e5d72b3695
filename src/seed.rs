use chrono::Utc;
use tracing::info;

use crate::campaign::manager;
use crate::database::Database;
use crate::error::Error;
use crate::member::{Member, MemberId, MemberStatus, MemberType};

/// Wipes the database and fills it with a campaign and one pending member of
/// every type, for poking at a local server.
pub async fn seed(db: &dyn Database) -> Result<(), Error> {
    db.drop().await?;

    let campaign =
        manager::create_campaign(db, "Autumn Launch".to_string(), "AC31", manager::today())
            .await?;
    info!(code = %campaign.campaign_code, "seeded campaign");

    let members = [
        (MemberType::Agency, "Hangang Agency", "Park Jiwoo"),
        (MemberType::Advertiser, "Jeju Tangerine Co.", "Lee Seoyeon"),
        (MemberType::Partner, "Blue Sky Media", "Choi Hyunwoo"),
    ];

    for (member_type, name, manager_name) in members.iter() {
        let now = Utc::now();
        let member = Member {
            id: MemberId::new(),
            member_type: *member_type,
            status: MemberStatus::Pending,
            name: name.to_string(),
            biz_no: "123-45-67890".to_string(),
            manager_name: manager_name.to_string(),
            phone: "010-1234-5678".to_string(),
            created_at: now,
            modified_at: now,
            review: None,
        };

        db.members(*member_type).insert_member(&member).await?;
    }

    info!("seeded pending members");

    Ok(())
}
