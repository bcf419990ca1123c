mod profile_tests;
