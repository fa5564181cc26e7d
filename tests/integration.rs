use chrono::{FixedOffset, TimeZone};
use mockito::{Matcher, Server};
use rs_marketo::{
    Attribute, Client, ClientConfig, Credential, FaultKind, FixedClock, LeadKey, MktError,
    SyncLeadRequest,
};

fn test_credential() -> Credential {
    Credential::new("bigcorp1_461839624B16E06BA2D663", "test-encryption-key")
}

fn test_clock() -> FixedClock {
    FixedClock(
        FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2013, 7, 22, 10, 15, 30)
            .unwrap(),
    )
}

fn test_client(endpoint: String) -> Client {
    let config = ClientConfig::new(endpoint);
    Client::with_config(test_credential(), config)
        .expect("failed to build client")
        .with_clock(test_clock())
}

fn soap_ok(inner: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/" xmlns:ns1="http://www.marketo.com/mktows/">
<SOAP-ENV:Body>{inner}</SOAP-ENV:Body></SOAP-ENV:Envelope>"#
    )
}

const LEAD_NOT_FOUND_FAULT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<SOAP-ENV:Envelope xmlns:SOAP-ENV="http://schemas.xmlsoap.org/soap/envelope/">
<SOAP-ENV:Body><SOAP-ENV:Fault>
<faultcode>SOAP-ENV:Client</faultcode>
<faultstring>20103 - Lead not found</faultstring>
<detail><ns1:serviceException xmlns:ns1="http://www.marketo.com/mktows/">
<name>mktServiceException</name>
<message>No lead found with EMAIL = john@doe (20103)</message>
<code>20103</code>
</ns1:serviceException></detail>
</SOAP-ENV:Fault></SOAP-ENV:Body></SOAP-ENV:Envelope>"#;

#[tokio::test]
async fn get_lead_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_header("Content-Type", "text/xml;charset=UTF-8")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("<mktowsUserId>bigcorp1_461839624B16E06BA2D663</mktowsUserId>".into()),
            Matcher::Regex(r"<requestSignature>[0-9a-f]{40}</requestSignature>".into()),
            Matcher::Regex(
                r"<requestTimestamp>2013-07-22T10:15:30\+01:00</requestTimestamp>".into(),
            ),
            Matcher::Regex(
                "<env:Body><ns1:paramsGetLead><leadKey><keyType>EMAIL</keyType>\
                 <keyValue>john@do.com</keyValue></leadKey></ns1:paramsGetLead></env:Body>"
                    .into(),
            ),
        ]))
        .with_status(200)
        .with_header("Content-Type", "text/xml;charset=UTF-8")
        .with_body(soap_ok(
            "<ns1:successGetLead><result><count>1</count><leadRecordList><leadRecord>\
             <Id>1001</Id><Email>john@do.com</Email><leadAttributeList>\
             <attribute><attrName>FirstName</attrName><attrType>string</attrType><attrValue>John</attrValue></attribute>\
             </leadAttributeList></leadRecord></leadRecordList></result></ns1:successGetLead>",
        ))
        .create_async()
        .await;

    let client = test_client(server.url());

    let lead = client
        .get_lead(&LeadKey::Email("john@do.com".into()))
        .await
        .expect("get_lead should succeed");

    assert_eq!(lead.id, Some(1001));
    assert_eq!(lead.email.as_deref(), Some("john@do.com"));
    assert_eq!(lead.attribute("FirstName"), Some("John"));

    mock.assert_async().await;
}

#[tokio::test]
async fn get_lead_not_found_fault() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(500)
        .with_header("Content-Type", "text/xml;charset=UTF-8")
        .with_body(LEAD_NOT_FOUND_FAULT)
        .create_async()
        .await;

    let client = test_client(server.url());

    let err = client
        .get_lead(&LeadKey::Email("john@doe".into()))
        .await
        .expect_err("get_lead should fail with a fault");

    match err {
        MktError::Fault { kind, message } => {
            assert_eq!(kind, FaultKind::LeadNotFound);
            assert_eq!(message, "No lead found with EMAIL = john@doe (20103)");
        }
        other => panic!("expected MktError::Fault, got: {:?}", other),
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn fault_body_with_ok_status() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(soap_ok(
            "<SOAP-ENV:Fault><faultcode>SOAP-ENV:Client</faultcode>\
             <faultstring>Bad Request</faultstring></SOAP-ENV:Fault>",
        ))
        .create_async()
        .await;

    let client = test_client(server.url());

    let err = client
        .get_lead(&LeadKey::IdNum(1))
        .await
        .expect_err("fault body should be an error");
    assert_eq!(err.kind(), Some(FaultKind::Generic));
    assert_eq!(err.to_string(), "Bad Request");

    mock.assert_async().await;
}

#[tokio::test]
async fn non_xml_error_body() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(502)
        .with_body("Non XML message")
        .create_async()
        .await;

    let client = test_client(server.url());

    let err = client
        .get_lead_activity(&LeadKey::Cookie("id:561-HYG-937&token:abc".into()))
        .await
        .expect_err("should fail");
    assert_eq!(err.message(), Some("parsing error: Non XML message"));

    mock.assert_async().await;
}

#[tokio::test]
async fn get_lead_activity_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(
            "<ns1:paramsGetLeadActivity><leadKey><keyType>COOKIE</keyType>\
             <keyValue>id:561-HYG-937&amp;token:abc</keyValue>"
                .into(),
        ))
        .with_status(200)
        .with_body(soap_ok(
            "<ns1:successGetLeadActivity><leadActivityList><returnCount>1</returnCount>\
             <activityRecordList><activityRecord><id>501</id>\
             <activityDateTime>2013-07-22T10:15:30+02:00</activityDateTime>\
             <activityType>Visit Webpage</activityType><mktgAssetName>pricing.html</mktgAssetName>\
             </activityRecord></activityRecordList></leadActivityList></ns1:successGetLeadActivity>",
        ))
        .create_async()
        .await;

    let client = test_client(server.url());

    let records = client
        .get_lead_activity(&LeadKey::Cookie("id:561-HYG-937&token:abc".into()))
        .await
        .expect("get_lead_activity should succeed");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, Some(501));
    assert_eq!(records[0].activity_type.as_deref(), Some("Visit Webpage"));
    assert_eq!(records[0].mktg_asset_name.as_deref(), Some("pricing.html"));

    mock.assert_async().await;
}

#[tokio::test]
async fn sync_lead_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(
            "<mkt:paramsSyncLead><leadRecord><Email>john@do.com</Email>\
             <leadAttributeList><attribute><attrName>Company</attrName>\
             <attrType>string</attrType><attrValue>Do &amp; Co</attrValue></attribute>\
             </leadAttributeList></leadRecord><returnLead>true</returnLead></mkt:paramsSyncLead>"
                .into(),
        ))
        .with_status(200)
        .with_body(soap_ok(
            "<ns1:successSyncLead><result><leadId>1001</leadId><syncStatus>\
             <leadId>1001</leadId><status>CREATED</status></syncStatus>\
             <leadRecord><Id>1001</Id><Email>john@do.com</Email><leadAttributeList>\
             <attribute><attrName>Company</attrName><attrType>string</attrType><attrValue>Do &amp; Co</attrValue></attribute>\
             </leadAttributeList></leadRecord></result></ns1:successSyncLead>",
        ))
        .create_async()
        .await;

    let client = test_client(server.url());

    let lead = client
        .sync_lead(
            &SyncLeadRequest::new()
                .with_email("john@do.com")
                .with_attribute(Attribute::new("Company", "string", "Do & Co")),
        )
        .await
        .expect("sync_lead should succeed");

    assert_eq!(lead.id, Some(1001));
    assert_eq!(lead.attribute("Company"), Some("Do & Co"));

    mock.assert_async().await;
}

#[tokio::test]
async fn request_campaign_success() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(
            "<mkt:paramsRequestCampaign><source>MKTOWS</source><campaignId>1234</campaignId>\
             <leadList><leadKey><keyType>IDNUM</keyType><keyValue>1001</keyValue></leadKey>\
             </leadList></mkt:paramsRequestCampaign>"
                .into(),
        ))
        .with_status(200)
        .with_body(soap_ok(
            "<ns1:successRequestCampaign><result><success>true</success></result></ns1:successRequestCampaign>",
        ))
        .create_async()
        .await;

    let client = test_client(server.url());

    let ok = client
        .request_campaign(1234, 1001)
        .await
        .expect("request_campaign should succeed");
    assert!(ok);

    mock.assert_async().await;
}

#[test]
fn wrap_is_deterministic_with_fixed_clock() {
    let client = test_client("http://localhost".to_string());
    let first = client.wrap("<body/>").unwrap();
    let second = client.wrap("<body/>").unwrap();
    assert_eq!(first, second);
    assert!(first.ends_with("<env:Body><body/></env:Body></env:Envelope>"));
    assert!(first.contains("<requestTimestamp>2013-07-22T10:15:30+01:00</requestTimestamp>"));
}

#[tokio::test]
async fn concurrent_requests_share_client() {
    use std::sync::Arc;
    use tokio::task::JoinSet;

    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(soap_ok(
            "<ns1:successGetLead><result><leadRecordList><leadRecord><Id>7</Id></leadRecord>\
             </leadRecordList></result></ns1:successGetLead>",
        ))
        .expect(5)
        .create_async()
        .await;

    let client = Arc::new(test_client(server.url()));

    let mut tasks = JoinSet::new();
    for i in 0..5 {
        let client = Arc::clone(&client);
        tasks.spawn(async move { client.get_lead(&LeadKey::IdNum(i)).await });
    }

    let mut success_count = 0;
    while let Some(result) = tasks.join_next().await {
        if result.unwrap().is_ok_and(|lead| lead.id == Some(7)) {
            success_count += 1;
        }
    }

    assert_eq!(success_count, 5);
    mock.assert_async().await;
}
