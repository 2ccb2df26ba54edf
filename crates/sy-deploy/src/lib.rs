pub mod api_parser;
pub mod cursor;
pub mod endpoint_parser;
pub mod error;
pub mod inbound_parser;
pub mod loader;
pub mod mediator_parser;
pub mod sequence_parser;

pub use error::DeployError;
pub use loader::deploy;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &std::path::Path, subdir: &str, name: &str, contents: &str) {
        let sub = dir.join(subdir);
        std::fs::create_dir_all(&sub).unwrap();
        let mut file = std::fs::File::create(sub.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn deploys_a_minimal_echo_api() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "APIs",
            "echo.xml",
            r#"<api context="/e" name="E">
                <resource methods="POST" uri-template="/echo">
                    <inSequence><respond/></inSequence>
                </resource>
            </api>"#,
        );

        let graph = deploy(dir.path());
        assert_eq!(graph.api_count(), 1);
        let api = graph.api("E").expect("api E should be deployed");
        assert_eq!(api.context, "/e");
        assert_eq!(api.resources.len(), 1);
        assert_eq!(api.resources[0].in_sequence.mediators.len(), 1);
    }

    #[test]
    fn duplicate_api_name_is_skipped_not_fatal() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "APIs",
            "a1.xml",
            r#"<api context="/a" name="Dup"><resource methods="GET" uri-template="/x"><inSequence><respond/></inSequence></resource></api>"#,
        );
        write_file(
            dir.path(),
            "APIs",
            "a2.xml",
            r#"<api context="/b" name="Dup"><resource methods="GET" uri-template="/x"><inSequence><respond/></inSequence></resource></api>"#,
        );

        let graph = deploy(dir.path());
        assert_eq!(graph.api_count(), 1);
    }

    #[test]
    fn named_sequence_and_endpoint_are_registered() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "Sequences",
            "s1.xml",
            r#"<sequence name="Shared"><log category="INFO"><message>hi</message></log></sequence>"#,
        );
        write_file(
            dir.path(),
            "Endpoints",
            "e1.xml",
            r#"<endpoint name="Up"><http method="POST" uri-template="http://127.0.0.1:1/x"/></endpoint>"#,
        );

        let graph = deploy(dir.path());
        assert!(graph.sequence("Shared").is_some());
        assert!(graph.endpoint("Up").is_some());
    }

    #[test]
    fn file_inbound_without_required_file_uri_is_skipped() {
        let dir = tempdir().unwrap();
        write_file(
            dir.path(),
            "Sequences",
            "s1.xml",
            r#"<sequence name="S"><respond/></sequence>"#,
        );
        write_file(
            dir.path(),
            "Inbounds",
            "i1.xml",
            r#"<inbound name="BadFile" sequence="S" protocol="file">
                <parameters>
                    <parameter name="interval">1000</parameter>
                </parameters>
            </inbound>"#,
        );

        let graph = deploy(dir.path());
        assert!(graph.inbound("BadFile").is_none());
    }
}
