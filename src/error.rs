use std::fmt::{Debug, Display};
use std::io::Error as IoError;

use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derivative::Derivative;
use mongodb::bson::ser::Error as BsonError;
use mongodb::error::Error as DatabaseError;
use serde::{Serialize, Serializer};

use crate::campaign::CampaignId;
use crate::member::{MemberId, MemberStatus, MemberType};

#[derive(Debug, Serialize, Derivative)]
#[derivative(PartialEq, Eq)]
#[serde(untagged)]
pub enum Error {
    // 400
    #[serde(serialize_with = "display")]
    InvalidJson(#[derivative(PartialEq = "ignore")] JsonPayloadError),
    #[serde(serialize_with = "display")]
    InvalidPath(#[derivative(PartialEq = "ignore")] PathError),
    #[serde(serialize_with = "display")]
    InvalidQuery(#[derivative(PartialEq = "ignore")] QueryPayloadError),
    InvalidPartnerCode {
        partner_code: String,
    },

    // 404
    PathDoesNotExist,
    CampaignDoesNotExist {
        campaign_id: CampaignId,
    },
    MemberDoesNotExist {
        member_type: MemberType,
        member_id: MemberId,
    },

    // 409
    ConcurrentModificationDetected,
    MemberIsNotPending {
        member_id: MemberId,
        status: MemberStatus,
    },
    CampaignCodeSequenceExhausted {
        partner_code: String,
        date_string: String,
        sequence_number: u64,
    },

    // 500
    ExistentialState(String),
    InvalidConfiguration {
        key: &'static str,
        value: String,
    },
    #[serde(serialize_with = "display")]
    FailedDatabaseCall(#[derivative(PartialEq = "ignore")] DatabaseError),
    #[serde(serialize_with = "display")]
    FailedToSerializeToBson(#[derivative(PartialEq = "ignore")] BsonError),
    #[serde(serialize_with = "display")]
    IoError(#[derivative(PartialEq = "ignore")] IoError),
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "E4001000",
            Error::InvalidPath(_) => "E4001001",
            Error::InvalidQuery(_) => "E4001002",
            Error::InvalidPartnerCode { .. } => "E4001003",
            Error::PathDoesNotExist => "E4041000",
            Error::CampaignDoesNotExist { .. } => "E4041001",
            Error::MemberDoesNotExist { .. } => "E4041002",
            Error::ConcurrentModificationDetected => "E4091000",
            Error::MemberIsNotPending { .. } => "E4091001",
            Error::CampaignCodeSequenceExhausted { .. } => "E4091002",
            Error::ExistentialState(_) => "E5001000",
            Error::InvalidConfiguration { .. } => "E5001001",
            Error::FailedDatabaseCall(_) => "E5001002",
            Error::FailedToSerializeToBson(_) => "E5001003",
            Error::IoError(_) => "E5001004",
        }
    }

    pub fn error_message(&self) -> &'static str {
        match self {
            Error::InvalidJson(_) => "The given json could not be parsed",
            Error::InvalidPath(_) => "The given path could not be parsed",
            Error::InvalidQuery(_) => "The given query could not be parsed",
            Error::InvalidPartnerCode { .. } => {
                "The given partner code must carry a one or two digit number"
            }
            Error::PathDoesNotExist => "The requested path does not exist",
            Error::CampaignDoesNotExist { .. } => "The requested campaign does not exist",
            Error::MemberDoesNotExist { .. } => "The requested member does not exist",
            Error::ConcurrentModificationDetected => {
                "The server detected a concurrent modification"
            }
            Error::MemberIsNotPending { .. } => "The requested member is not pending approval",
            Error::CampaignCodeSequenceExhausted { .. } => {
                "The partner has used every campaign code sequence number for the day"
            }
            Error::ExistentialState(_) => "The server detected an invalid state",
            Error::InvalidConfiguration { .. } => "The server configuration could not be parsed",
            Error::FailedDatabaseCall(_) => {
                "An error occurred when communicating with the database"
            }
            Error::FailedToSerializeToBson(_) => {
                "An error occurred when serializing an object to bson"
            }
            Error::IoError(_) => "An error occurred during an I/O operation",
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson(_)
            | Error::InvalidPath(_)
            | Error::InvalidQuery(_)
            | Error::InvalidPartnerCode { .. } => StatusCode::BAD_REQUEST,
            Error::PathDoesNotExist
            | Error::CampaignDoesNotExist { .. }
            | Error::MemberDoesNotExist { .. } => StatusCode::NOT_FOUND,
            Error::ConcurrentModificationDetected
            | Error::MemberIsNotPending { .. }
            | Error::CampaignCodeSequenceExhausted { .. } => StatusCode::CONFLICT,
            Error::ExistentialState(_)
            | Error::InvalidConfiguration { .. }
            | Error::FailedDatabaseCall(_)
            | Error::FailedToSerializeToBson(_)
            | Error::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        #[derive(Serialize)]
        struct Dummy<'a> {
            success: bool,
            error: &'static str,
            error_code: &'static str,
            error_meta: &'a Error,
        }

        HttpResponse::build(self.status_code()).json(&Dummy {
            success: false,
            error: self.error_message(),
            error_code: self.error_code(),
            error_meta: self,
        })
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        Debug::fmt(self, f)
    }
}

impl From<DatabaseError> for Error {
    fn from(error: DatabaseError) -> Error {
        Error::FailedDatabaseCall(error)
    }
}

impl From<BsonError> for Error {
    fn from(error: BsonError) -> Error {
        Error::FailedToSerializeToBson(error)
    }
}

impl From<IoError> for Error {
    fn from(error: IoError) -> Error {
        Error::IoError(error)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidJson(err) => Some(err),
            Error::InvalidPath(err) => Some(err),
            Error::InvalidQuery(err) => Some(err),
            Error::FailedDatabaseCall(err) => Some(err),
            Error::FailedToSerializeToBson(err) => Some(err),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
