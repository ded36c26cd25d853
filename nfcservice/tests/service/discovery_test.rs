#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use nfcservice::host::{MockNfccHost, TagHost};
use nfcservice::service::ServiceConfig;
use nfcservice::tag::{BasicTagSession, IsoDepTag, NfcATag};
use nfcservice::test_support::initialized_mock_service;
use nfcservice::{NfcTask, TagTechnology};

#[test]
fn tag_with_single_tech_yields_only_that_session() -> anyhow::Result<()> {
    common::init_logging();
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    service.execute_task(NfcTask::TurnOn, false)?;

    let rx = service.tag_dispatcher().subscribe();
    assert!(host.discover(common::fixtures::nfca_only_tag()));

    let tag = rx.try_recv()?;
    assert_eq!(tag.technologies().iter().collect::<Vec<_>>(), vec![TagTechnology::NfcA]);
    assert!(service.tag_dispatcher().session::<IsoDepTag>(&tag).is_none());

    let nfca = service
        .tag_dispatcher()
        .session::<NfcATag>(&tag)
        .expect("nfca session");
    assert_eq!(nfca.sak(), 0x20);
    assert_eq!(nfca.atqa(), "4400");
    Ok(())
}

#[test]
fn iso_dep_session_talks_to_the_tag() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    service.execute_task(NfcTask::TurnOn, false)?;

    let card = common::fixtures::iso_dep_card();
    card.push_response(common::fixtures::status_ok());
    let handle: Arc<dyn TagHost> = card.clone();
    host.discover(handle);

    let tag = service.tag_dispatcher().current_tag().expect("tag present");
    let iso = service
        .tag_dispatcher()
        .session::<IsoDepTag>(&tag)
        .expect("isodep session");
    assert_eq!(
        iso.historical_bytes(),
        hex::encode(common::fixtures::sample_historical_bytes())
    );
    assert_eq!(iso.hi_layer_response(), "00");
    assert!(iso.is_extended_apdu_supported());

    iso.connect()?;
    assert_eq!(card.connected_tech(), Some(TagTechnology::IsoDep));
    let resp = iso.transceive(&common::fixtures::select_ppse_apdu())?;
    assert_eq!(resp, common::fixtures::status_ok());
    assert_eq!(card.sent.lock().unwrap()[0], common::fixtures::select_ppse_apdu());
    Ok(())
}

#[test]
fn tag_leaving_field_invalidates_session() -> anyhow::Result<()> {
    let host = MockNfccHost::new();
    let service = initialized_mock_service(&host, ServiceConfig::default())?;
    service.execute_task(NfcTask::TurnOn, false)?;

    host.discover(common::fixtures::iso_dep_card());
    let tag = service.tag_dispatcher().current_tag().expect("tag present");
    let iso = service
        .tag_dispatcher()
        .session::<IsoDepTag>(&tag)
        .expect("isodep session");

    host.clear_field();
    assert!(!iso.is_tag_alive());
    assert_eq!(iso.historical_bytes(), "");
    assert!(!iso.is_extended_apdu_supported());
    assert_eq!(iso.transceive(&[0x00]), Err(nfcservice::Error::TagLost));
    assert!(service.tag_dispatcher().current_tag().is_none());
    Ok(())
}
