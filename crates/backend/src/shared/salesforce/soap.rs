//! Helpers for the SOAP partner `login` call.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;

use super::error::CrmError;

/// Request body for `POST {login_url}/services/Soap/u/{version}`
///
/// Salesforce expects the security token appended to the password.
pub fn login_envelope(username: &str, password: &str, security_token: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8" ?>
<env:Envelope xmlns:xsd="http://www.w3.org/2001/XMLSchema"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
    xmlns:env="http://schemas.xmlsoap.org/soap/envelope/"
    xmlns:urn="urn:partner.soap.sforce.com">
  <env:Header>
    <urn:CallOptions>
      <urn:client>oppdash</urn:client>
    </urn:CallOptions>
  </env:Header>
  <env:Body>
    <n1:login xmlns:n1="urn:partner.soap.sforce.com">
      <n1:username>{}</n1:username>
      <n1:password>{}{}</n1:password>
    </n1:login>
  </env:Body>
</env:Envelope>"#,
        escape(username),
        escape(password),
        escape(security_token)
    )
}

/// Text of the first `<tag>` element, matched by local name so any namespace
/// prefix is accepted. Entity and character references are decoded and CDATA
/// sections are read as-is.
pub fn extract_tag(xml: &str, tag: &str) -> Result<Option<String>, CrmError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut inside = false;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if inside {
                    depth += 1;
                } else if e.local_name().as_ref() == tag.as_bytes() {
                    inside = true;
                }
            }
            Ok(Event::Empty(e)) if !inside && e.local_name().as_ref() == tag.as_bytes() => {
                return Ok(Some(String::new()));
            }
            Ok(Event::Text(e)) if inside => {
                let value = e.unescape().map_err(|e| xml_error(&reader, e))?;
                text.push_str(&value);
            }
            Ok(Event::CData(e)) if inside => {
                let value = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|e| xml_error(&reader, e))?;
                text.push_str(&value);
            }
            Ok(Event::End(_)) if inside => {
                if depth == 0 {
                    return Ok(Some(text.trim().to_string()));
                }
                depth -= 1;
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> CrmError {
    CrmError::Parse(format!(
        "Invalid XML at position {}: {}",
        reader.buffer_position(),
        err
    ))
}

/// "https://na1.salesforce.com/services/Soap/u/59.0/00D..." -> "https://na1.salesforce.com"
pub fn instance_url(server_url: &str) -> Option<String> {
    let url = reqwest::Url::parse(server_url).ok()?;
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
        None => format!("{}://{}", url.scheme(), host),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOGIN_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns="urn:partner.soap.sforce.com">
<soapenv:Body><loginResponse><result>
<metadataServerUrl>https://acme.my.salesforce.com/services/Soap/m/59.0/00D000000000001</metadataServerUrl>
<passwordExpired>false</passwordExpired>
<serverUrl>https://acme.my.salesforce.com/services/Soap/u/59.0/00D000000000001</serverUrl>
<sessionId>00D000000000001!AQ0AQ&amp;xyz</sessionId>
</result></loginResponse></soapenv:Body></soapenv:Envelope>"#;

    const FAULT_RESPONSE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:sf="urn:fault.partner.soap.sforce.com">
<soapenv:Body><soapenv:Fault><faultcode>sf:INVALID_LOGIN</faultcode>
<faultstring>INVALID_LOGIN: Invalid username, password, security token; or user locked out.</faultstring>
</soapenv:Fault></soapenv:Body></soapenv:Envelope>"#;

    #[test]
    fn test_envelope_escapes_and_appends_token() {
        let body = login_envelope("a&b@example.com", "p<w>d", "TOKEN");
        assert!(body.contains("<n1:username>a&amp;b@example.com</n1:username>"));
        assert!(body.contains("<n1:password>p&lt;w&gt;dTOKEN</n1:password>"));
    }

    #[test]
    fn test_extract_login_values() {
        assert_eq!(
            extract_tag(LOGIN_RESPONSE, "sessionId").unwrap().as_deref(),
            Some("00D000000000001!AQ0AQ&xyz")
        );
        let server_url = extract_tag(LOGIN_RESPONSE, "serverUrl").unwrap().unwrap();
        assert_eq!(
            instance_url(&server_url).as_deref(),
            Some("https://acme.my.salesforce.com")
        );
        assert_eq!(extract_tag(LOGIN_RESPONSE, "faultstring").unwrap(), None);
    }

    #[test]
    fn test_extract_fault() {
        let fault = extract_tag(FAULT_RESPONSE, "faultstring").unwrap().unwrap();
        assert!(fault.starts_with("INVALID_LOGIN"));
        assert_eq!(
            extract_tag(FAULT_RESPONSE, "faultcode").unwrap().as_deref(),
            Some("sf:INVALID_LOGIN")
        );
    }

    #[test]
    fn test_extract_decodes_character_references() {
        let xml = "<faultstring>INVALID_LOGIN: user&#39;s password &#x26; token</faultstring>";
        assert_eq!(
            extract_tag(xml, "faultstring").unwrap().as_deref(),
            Some("INVALID_LOGIN: user's password & token")
        );
    }

    #[test]
    fn test_extract_reads_cdata_without_wrapper() {
        let xml = "<r:result xmlns:r=\"urn:x\"><r:sessionId><![CDATA[00D!AQ<x>]]></r:sessionId></r:result>";
        assert_eq!(
            extract_tag(xml, "sessionId").unwrap().as_deref(),
            Some("00D!AQ<x>")
        );
    }

    #[test]
    fn test_extract_malformed_xml_is_parse_error() {
        let err = extract_tag("<result><sessionId>abc</result>", "serverUrl").unwrap_err();
        assert!(matches!(err, CrmError::Parse(_)));
    }

    #[test]
    fn test_instance_url_keeps_port() {
        assert_eq!(
            instance_url("http://localhost:8443/services/Soap/u/59.0").as_deref(),
            Some("http://localhost:8443")
        );
        assert_eq!(instance_url("not a url"), None);
    }
}
