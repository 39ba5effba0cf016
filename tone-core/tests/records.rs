//! Decoding realistic list responses end to end through `decode_list`.

use rstest::rstest;
use serde_json::{json, Value};

use tone_core::filter::filter_by_fields;
use tone_core::normalize::decode_list;
use tone_core::{
    Agent, AgentType, ChannelRow, FetchError, OrganizationInvite, OrganizationMember,
    ProviderType, ResourceKind, Role, ServiceProvider, Session,
};

fn providers_body() -> Value {
    json!([
        {
            "id": 1,
            "uuid": "8f0c",
            "name": "openai",
            "display_name": "OpenAI",
            "description": "GPT models",
            "provider_type": "llm",
            "status": "active",
            "created_at": "1717000000",
            "models": [
                { "id": 10, "service_provider_id": 1, "name": "gpt-4o", "meta_data": null }
            ]
        },
        {
            "id": 2,
            "uuid": null,
            "name": "deepgram",
            "display_name": null,
            "description": null,
            "provider_type": "stt",
            "status": "active",
            "models": null
        }
    ])
}

#[test]
fn providers_decode_with_nulls_and_string_epochs() {
    let providers: Vec<ServiceProvider> =
        decode_list(ResourceKind::Providers, providers_body()).unwrap();
    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].created_at, Some(1_717_000_000));
    assert_eq!(providers[0].models[0].name, "gpt-4o");
    assert_eq!(providers[1].provider_type, ProviderType::Stt);
    assert!(providers[1].display_name.is_empty());
    assert!(providers[1].models.is_empty());
}

#[rstest]
#[case(json!("inbound"), AgentType::Inbound)]
#[case(json!(0), AgentType::Inbound)]
#[case(json!("OUTBOUND"), AgentType::Outbound)]
#[case(json!(1), AgentType::Outbound)]
#[case(json!("widget"), AgentType::Widget)]
#[case(json!("carrier-pigeon"), AgentType::Outbound)]
#[case(Value::Null, AgentType::Outbound)]
fn agent_type_spellings(#[case] raw: Value, #[case] expected: AgentType) {
    let agents: Vec<Agent> = decode_list(
        ResourceKind::Agents,
        json!({ "data": [{ "id": 1, "name": "x", "type": raw }] }),
    )
    .unwrap();
    assert_eq!(agents[0].agent_type, expected);
}

#[test]
fn channel_rows_are_built_during_decode() {
    let rows: Vec<ChannelRow> = decode_list::<tone_core::Channel>(
        ResourceKind::Channels,
        json!([
            { "id": 3, "name": "Sales", "type": "TWILIO",
              "meta_data": { "account_sid": "AC9", "auth_token": "tok" },
              "created_at": 1704207845 },
            { "id": 4, "name": "Support", "meta_data": null }
        ]),
    )
    .unwrap()
    .into_iter()
    .map(ChannelRow::from)
    .collect();

    assert_eq!(rows[0].created_at, "02-01-2024 15:04:05");
    assert_eq!(rows[0].auth_token, "tok");
    assert_eq!(rows[1].auth_token, "••••••••");
    assert_eq!(rows[1].created_at, "-");
}

#[test]
fn members_and_invites_filter_by_any_field() {
    let members: Vec<OrganizationMember> = decode_list(
        ResourceKind::Members,
        json!([
            { "member_id": 1, "user_id": 7, "email": "ana@example.com", "username": "ana",
              "first_name": "ana", "last_name": "lima", "role": "owner", "status": "active",
              "joined_at": 1700000000 },
            { "member_id": 2, "user_id": 8, "email": "bo@example.com", "username": "bo",
              "role": "viewer", "status": "active" }
        ]),
    )
    .unwrap();
    assert_eq!(members[0].parsed_role(), Some(Role::Owner));

    let hits = filter_by_fields(
        &members,
        "LIMA",
        &[
            |m: &OrganizationMember| Some(m.display_name()),
            |m: &OrganizationMember| Some(m.email.clone()),
        ],
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].member_id, 1);

    let invites: Vec<OrganizationInvite> = decode_list(
        ResourceKind::Invitations,
        json!([{ "member_id": 9, "email": "cy@example.com", "name": "Cy", "role": "member", "status": "pending" }]),
    )
    .unwrap();
    assert_eq!(invites[0].status, "pending");
}

#[test]
fn bad_element_fails_the_whole_list() {
    let err = decode_list::<OrganizationInvite>(
        ResourceKind::Invitations,
        json!([{ "member_id": 1 }, { "member_id": "not a number" }]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FetchError::Decode {
            resource: ResourceKind::Invitations,
            ..
        }
    ));
}

#[test]
fn session_round_trips_through_yaml() {
    let yaml = "\
access_token: abc
tenant_id: 2
email: ana@example.com
username: ana
organizations:
  - id: 1
    name: Personal
    role: owner
  - id: 2
    name: Acme
    role: member
saved_at: 2024-03-01T12:00:00Z
";
    let session: Session = serde_yaml::from_str(yaml).unwrap();
    let user = session.current_user();
    assert_eq!(user.organization.map(|o| o.name), Some("Acme".to_string()));
    assert_eq!(user.role, Some(Role::Member));
}
