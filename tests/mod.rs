mod google_api_mock;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - google_api_mock: In-memory Google API and shared fixtures
// - meeting_handler: Meeting creation rules, called directly
// - router: HTTP status codes and bodies through the axum router
// - end_to_end: The meetings client against a served router
