use bizdesk_auth::{
    load_grants, AccessError, Actor, DelegateRole, MemberAction, MemberId, PermissionGate, PermissionId,
    PermissionSet, Role, Session,
};
use bizdesk_core::errors::DeskError;
use bizdesk_core::TenantContext;

fn session(actor: Actor) -> PermissionGate {
    PermissionGate::new(Session::new(TenantContext::new("glow-spa"), actor))
}

#[test]
fn staff_member_booking_and_self_deletion() {
    let staff = Actor::delegate(
        "m-17",
        DelegateRole::Staff,
        PermissionSet::parse_all(["appointments.create"]).unwrap(),
    );
    let gate = session(staff);

    assert!(gate.can_perform_id("appointments.create"));
    assert!(!gate.can_perform_id("appointments.delete"));

    let me = MemberId::from("m-17");
    assert_eq!(
        gate.authorize_member_action(MemberAction::Delete, &me),
        Err(AccessError::SelfModificationDenied {
            action: MemberAction::Delete
        })
    );
}

#[test]
fn self_deletion_denied_even_with_team_delete() {
    let staff = Actor::delegate(
        "m-17",
        DelegateRole::Staff,
        PermissionSet::parse_all(["appointments.create", "team.delete"]).unwrap(),
    );
    let gate = session(staff);

    let err = gate
        .authorize_member_action(MemberAction::Delete, &MemberId::from("m-17"))
        .unwrap_err();
    assert!(matches!(err, AccessError::SelfModificationDenied { .. }));

    // the same grant still works against somebody else
    assert!(gate
        .authorize_member_action(MemberAction::Delete, &MemberId::from("m-99"))
        .is_ok());
}

#[test]
fn denials_map_to_forbidden_desk_errors() {
    let gate = session(Actor::with_role_defaults("m-5", DelegateRole::Staff));

    let generic: DeskError = gate.authorize(&PermissionId::TEAM_DELETE).unwrap_err().into();
    assert_eq!(generic.code(), 403);
    assert_eq!(generic.to_json()["data"]["reason"], "access_denied");
    assert_eq!(generic.to_json()["data"]["permission"], "team.delete");

    let own: DeskError = gate
        .authorize_member_action(MemberAction::ChangeRole, &MemberId::from("m-5"))
        .unwrap_err()
        .into();
    assert_eq!(own.code(), 403);
    assert_eq!(own.to_json()["data"]["reason"], "self_modification_denied");
    assert!(own.message.contains("contact your administrator"));
}

#[test]
fn loaded_grants_drive_the_gate() {
    let actors = load_grants(
        r#"[
            {"member_id": "m-1", "role": "owner"},
            {"member_id": "m-2", "role": "manager"},
            {"member_id": "m-3", "role": "staff", "permissions": ["smtp.view", "smtp.test"]}
        ]"#,
    )
    .unwrap();

    assert_eq!(actors.len(), 3);
    assert_eq!(actors[0].role(), Role::Owner);

    let manager = session(actors[1].clone());
    assert!(manager.can_perform_id("leads.convert"));
    assert!(!manager.can_perform_id("smtp.edit"));

    let smtp_tester = session(actors[2].clone());
    assert!(smtp_tester.authorize_id("smtp.test").is_ok());
    assert!(smtp_tester.authorize_id("smtp.edit").is_err());
}

#[test]
fn role_change_replaces_the_session() {
    let before = session(Actor::with_role_defaults("m-8", DelegateRole::Staff));
    assert!(!before.can_perform(&PermissionId::TEAM_VIEW));

    let after = session(Actor::with_role_defaults("m-8", DelegateRole::Manager));
    assert!(after.can_perform(&PermissionId::TEAM_VIEW));
    assert!(!before.can_perform(&PermissionId::TEAM_VIEW));
}
