//! Undo Flow Tests
//!
//! Drives a session through edits, deletions and undos against a scripted
//! transport, checking the requests issued, the store contents and the undo
//! stack after every step.

#[cfg(test)]
mod undo_flow_tests {
    use anyhow::Result;
    use notesync_core::transport::{Method, MockTransport, TransportError};
    use notesync_core::{Note, SyncError, SyncService, TextContent, UndoEntry, UndoOutcome};
    use serde_json::json;
    use std::sync::Arc;

    /// Session with notebook head N0 and children N1 "Old", N2 "Doomed" cached
    fn create_session() -> (SyncService, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        let service = SyncService::new(transport.clone());
        service.store().load_notes(vec![
            Note::new("N0", None, "Notebook"),
            Note::new("N1", Some("N0".into()), "Old"),
            Note::new("N2", Some("N0".into()), "Doomed"),
        ]);
        (service, transport)
    }

    #[tokio::test]
    async fn test_edit_delete_then_undo_twice() -> Result<()> {
        let (service, transport) = create_session();

        transport
            .respond(
                Method::Patch,
                "/api/text_content/N1",
                json!({ "id": "N1", "parentId": "N0", "title": "Hello" }),
            )
            .respond(
                Method::Patch,
                "/api/text_content/N1",
                json!({ "id": "N1", "parentId": "N0", "title": "Old" }),
            );
        transport.respond(Method::Post, "/api/notes/N2/delete", json!({}));
        transport.respond(
            Method::Patch,
            "/api/notes/N2/undo-delete",
            json!({ "notes": [{ "id": "N2", "parentId": "N0", "title": "Doomed" }] }),
        );

        service
            .update_text_content("N1", TextContent::new("Hello", ""))
            .await?;
        assert_eq!(service.store().get_note("N1").unwrap().title, "Hello");

        service.delete_note("N2").await?;
        assert!(service.store().get_note("N2").is_none());
        assert_eq!(
            service.undo_history().entries(),
            vec![
                UndoEntry::edit("N1", TextContent::new("Old", "")),
                UndoEntry::delete("N2"),
            ]
        );

        // Most recent first: the deletion
        let outcome = service.undo().await?;
        assert!(matches!(outcome, UndoOutcome::Delete(_)));
        assert_eq!(service.store().get_note("N2").unwrap().title, "Doomed");
        assert_eq!(transport.call_count(Method::Patch, "/api/notes/N2/undo-delete"), 1);

        // Then the edit
        let outcome = service.undo().await?;
        match outcome {
            UndoOutcome::Edit(note) => assert_eq!(note.title, "Old"),
            other => panic!("Expected Edit outcome, got {:?}", other),
        }
        assert_eq!(service.store().get_note("N1").unwrap().title, "Old");

        let sent = transport.calls_to(Method::Patch, "/api/text_content/N1");
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].body.as_ref().unwrap()["title"], "Old");

        let err = service.undo().await.unwrap_err();
        assert!(matches!(err, SyncError::EmptyUndoStack));
        assert!(service.undo_history().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_recorded_entries_undo_in_reverse_order() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(
            Method::Patch,
            "/api/notes/N2/undo-delete",
            json!({ "notes": [{ "id": "N2", "parentId": "N0" }] }),
        );
        transport.respond(
            Method::Patch,
            "/api/text_content/N1",
            json!({ "id": "N1", "parentId": "N0", "title": "Hello" }),
        );

        service
            .undo_history()
            .push(UndoEntry::edit("N1", TextContent::new("Hello", "")));
        service.undo_history().push(UndoEntry::delete("N2"));

        service.undo().await?;
        assert_eq!(transport.calls()[0].path, "/api/notes/N2/undo-delete");

        service.undo().await?;
        assert_eq!(transport.calls()[1].path, "/api/text_content/N1");
        assert_eq!(transport.calls()[1].body.as_ref().unwrap()["title"], "Hello");
        assert_eq!(service.store().get_note("N1").unwrap().title, "Hello");
        assert!(service.undo_history().is_empty());

        assert!(service.undo().await.unwrap_err().is_empty_undo_stack());
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_of_edit_records_nothing() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(
            Method::Patch,
            "/api/text_content/N1",
            json!({ "id": "N1", "parentId": "N0", "title": "Whatever" }),
        );

        service
            .update_text_content("N1", TextContent::new("New", "body"))
            .await?;
        assert_eq!(service.undo_history().len(), 1);

        service.undo().await?;

        assert!(service.undo_history().is_empty());
        assert!(service.peek_undo().unwrap_err().is_empty_undo_stack());
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_delete_of_root_refreshes_notebooks_once() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(Method::Post, "/api/notes/N0/delete", json!({}));
        transport.respond(
            Method::Patch,
            "/api/notes/N0/undo-delete",
            json!({ "notes": [{ "id": "N0", "parentId": null, "title": "Notebook" }] }),
        );
        transport.respond(
            Method::Get,
            "/api/notebooks",
            json!({ "notebooks": [{ "id": 1, "headNoteId": "N0" }] }),
        );

        service.delete_note("N0").await?;
        service.undo().await?;

        assert_eq!(transport.call_count(Method::Get, "/api/notebooks"), 1);
        let notebooks = service.store().notebooks();
        assert_eq!(notebooks.len(), 1);
        assert_eq!(notebooks[0].head_note_id.as_deref(), Some("N0"));
        Ok(())
    }

    #[tokio::test]
    async fn test_undo_delete_of_child_skips_notebook_refresh() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(Method::Post, "/api/notes/N2/delete", json!({}));
        transport.respond(
            Method::Patch,
            "/api/notes/N2/undo-delete",
            json!({ "notes": [{ "id": "N2", "parentId": "N0", "title": "Doomed" }] }),
        );

        service.delete_note("N2").await?;
        service.undo().await?;

        assert_eq!(transport.call_count(Method::Get, "/api/notebooks"), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_notebook_refresh_failure_does_not_fail_undo() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(Method::Post, "/api/notes/N0/delete", json!({}));
        transport.respond(
            Method::Patch,
            "/api/notes/N0/undo-delete",
            json!({ "notes": [{ "id": "N0", "title": "Notebook" }] }),
        );
        transport.fail(
            Method::Get,
            "/api/notebooks",
            TransportError::status(503, "unavailable"),
        );

        service.delete_note("N0").await?;
        let outcome = service.undo().await?;

        assert!(matches!(outcome, UndoOutcome::Delete(_)));
        assert!(service.store().get_note("N0").is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_edit_leaves_session_untouched() -> Result<()> {
        let (service, transport) = create_session();
        transport.fail(
            Method::Patch,
            "/api/text_content/N1",
            TransportError::status(500, "boom"),
        );

        let err = service
            .update_text_content("N1", TextContent::new("Hello", ""))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(service.store().get_note("N1").unwrap().title, "Old");
        assert!(service.undo_history().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_delete_records_nothing() -> Result<()> {
        let (service, transport) = create_session();
        transport.fail(
            Method::Post,
            "/api/notes/N2/delete",
            TransportError::Network("connection reset".into()),
        );

        assert!(service.delete_note("N2").await.is_err());

        assert!(service.store().get_note("N2").is_some());
        assert!(service.undo_history().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_reversal_consumes_entry() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(Method::Post, "/api/notes/N2/delete", json!({}));
        transport.fail(
            Method::Patch,
            "/api/notes/N2/undo-delete",
            TransportError::status(404, "gone"),
        );

        service.delete_note("N2").await?;
        assert!(service.undo().await.is_err());

        assert!(service.undo_history().is_empty());
        assert!(service.store().get_note("N2").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_edit_of_uncached_note_is_not_undoable() -> Result<()> {
        let (service, transport) = create_session();
        transport.respond(
            Method::Patch,
            "/api/text_content/N9",
            json!({ "id": "N9", "title": "Fresh" }),
        );

        service
            .update_text_content("N9", TextContent::new("Fresh", ""))
            .await?;

        assert_eq!(service.store().get_note("N9").unwrap().title, "Fresh");
        assert!(service.undo_history().is_empty());
        Ok(())
    }
}
